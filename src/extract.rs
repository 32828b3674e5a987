//! Reading one result card off the page.
//!
//! Cards come in two shapes. Media cards carry an image placement container
//! and use an `h3` headline; text cards have an `a` title and no image. A
//! media card with a video badge keeps its thumbnail in a different
//! container than a still photo, so the badge decides which image locator is
//! read.

use crate::browser::BrowserSession;
use crate::browser::locators::Locators;
use crate::download::{Downloader, image_file_name, resolve_src};
use crate::error::Result;
use crate::models::ScrapedCard;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Read the card at page position `position` (1-based) and download its
/// image, if any, as `image_news{index}.png` under `image_dir`.
///
/// # Arguments
/// * `position` - Place of the card on the current page
/// * `index` - Running index across all pages, used for the image name
///
/// # Errors
/// A missing headline or date element, or a failed download. A media card
/// without a usable `src` is logged and returned without an image.
#[instrument(level = "info", skip_all, fields(position = position, index = index))]
pub async fn extract_card<S, D>(
    session: &mut S,
    downloader: &D,
    locators: &Locators,
    position: usize,
    index: usize,
    image_dir: &Path,
) -> Result<ScrapedCard>
where
    S: BrowserSession,
    D: Downloader,
{
    let media = session
        .is_enabled(&locators.media_container(position))
        .await?;

    let headline = session.text(&locators.headline(position, media)).await?;
    let published = session.text(&locators.published(position, media)).await?;

    let image_file = if media {
        let video = session.is_enabled(&locators.video_badge(position)).await?;
        debug!(video, "Media card");
        let src = session
            .attribute(&locators.image(position, video), "src")
            .await?;
        match src {
            Some(src) => {
                let page_url = session.current_url().await?;
                match resolve_src(&page_url, &src) {
                    Some(url) => {
                        let name = image_file_name(index);
                        downloader.download(&url, &image_dir.join(&name)).await?;
                        Some(name)
                    }
                    None => {
                        warn!(%src, "Image src could not be resolved; exporting without image");
                        None
                    }
                }
            }
            None => {
                warn!(%headline, "Media card has no image src; exporting without image");
                None
            }
        }
    } else {
        debug!("Text card");
        None
    };

    Ok(ScrapedCard {
        index,
        headline,
        published,
        image_file,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the extractor and harvester tests.

    use crate::download::Downloader;
    use crate::error::Result;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    /// Records downloads instead of performing them.
    #[derive(Debug, Default)]
    pub struct RecordingDownloader {
        pub calls: RefCell<Vec<(String, PathBuf)>>,
    }

    impl Downloader for RecordingDownloader {
        async fn download(&self, url: &str, target: &Path) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((url.to_string(), target.to_path_buf()));
            Ok(())
        }
    }

    pub fn media_card(headline: &str, date: &str, src: &str, video: bool) -> String {
        let l = crate::browser::locators::Locators::default();
        let badge = if video {
            format!(r#"<div class="{}"></div>"#, class_of(&l.video_badge))
        } else {
            String::new()
        };
        let img_class = if video {
            class_of(&l.video_image)
        } else {
            class_of(&l.still_image)
        };
        format!(
            r#"<li class="{item}"><div class="{placement}"><div class="{container}">{badge}<div class="{img_class}"><img src="{src}"></div></div></div><h3 class="{h3}">{headline}</h3><time class="{time}">{date}</time></li>"#,
            item = class_of(&l.result_item),
            placement = class_of(&l.media_container),
            container = class_of(&l.image_container),
            h3 = class_of(&l.media_headline),
            time = class_of(&l.media_time),
        )
    }

    pub fn text_card(headline: &str, date: &str) -> String {
        let l = crate::browser::locators::Locators::default();
        format!(
            r#"<li class="{item}"><a class="{a}" href="/x">{headline}</a><time class="{time}">{date}</time></li>"#,
            item = class_of(&l.result_item),
            a = class_of(&l.text_headline),
            time = class_of(&l.text_time),
        )
    }

    /// Wrap cards in a results page reporting `total` matches.
    pub fn results_page(total: usize, cards: &[String], next_enabled: bool) -> String {
        let l = crate::browser::locators::Locators::default();
        let disabled = if next_enabled { "" } else { " disabled" };
        format!(
            r#"<html><body><h1 id="main-content">Search results for oil</h1><div class="{container}"><span class="{count}">{total}</span><ul>{cards}</ul><button aria-label="Next stories"{disabled}>Next</button></div></body></html>"#,
            container = class_of(&l.results_container),
            count = class_of(&l.result_count),
            cards = cards.concat(),
        )
    }

    /// Pull the quoted class value out of a `tag[class="..."]` selector.
    fn class_of(selector: &str) -> String {
        selector
            .split('"')
            .nth(1)
            .unwrap_or_default()
            .to_string()
    }
}

//! Selector table for the Reuters search results page.
//!
//! Every class name the scraper depends on lives here. When the site's
//! markup changes only these strings need to change; they can also be
//! overridden from the `locators:` section of the YAML config.
//!
//! Attribute-equality selectors (`div[class="..."]`) are used on purpose so
//! the match is on the whole class attribute, not on any one class token.

use super::Locator;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Locators {
    pub results_container: String,
    pub main_heading: String,
    pub result_count: String,
    pub result_item: String,
    pub media_container: String,
    pub image_container: String,
    pub video_badge: String,
    pub video_image: String,
    pub still_image: String,
    pub media_headline: String,
    pub media_time: String,
    pub text_headline: String,
    pub text_time: String,
    pub next_button: String,
}

impl Default for Locators {
    fn default() -> Self {
        Locators {
            results_container: r#"div[class="search-results__sectionContainer__34n_c"]"#.into(),
            main_heading: "h1#main-content".into(),
            result_count: r#"span[class="text__text__1FZLe text__dark-grey__3Ml43 text__medium__1kbOh text__heading_6__1qUJ5 count"]"#.into(),
            result_item: r#"li[class="search-results__item__2oqiX"]"#.into(),
            media_container: r#"div[class="media-story-card__placement-container__1R55-"]"#.into(),
            image_container: r#"div[class="media-story-card__image-container__gQPAN"]"#.into(),
            video_badge: r#"div[class="media-story-card__media__27Yc8 media__symbol__1-WHq media__corner__-C897"]"#.into(),
            video_image: r#"div[class="styles__image-container__skIG1"] img"#.into(),
            still_image: r#"div[class="styles__image-container__skIG1 styles__cover__2dX1S styles__center_center__1AaPV styles__apply-ratio__1_FYQ styles__transition__1DEuZ"] img"#.into(),
            media_headline: r#"h3[class="text__text__1FZLe text__dark-grey__3Ml43 text__medium__1kbOh text__heading_6__1qUJ5 heading__base__2T28j heading__heading_6__RtD9P"]"#.into(),
            media_time: r#"time[class="text__text__1FZLe text__inherit-color__3208F text__regular__2N1Xr text__extra_small__1Mw6v body__base__22dCE body__extra_small_body__3QTYe media-story-card__time__2i9EK"]"#.into(),
            text_headline: r#"a[class="text__text__1FZLe text__dark-grey__3Ml43 text__medium__1kbOh text__heading_6__1qUJ5 heading__base__2T28j heading__heading_6__RtD9P text-story-card__title__3R37x"]"#.into(),
            text_time: r#"time[class="text__text__1FZLe text__inherit-color__3208F text__regular__2N1Xr text__extra_small__1Mw6v text-story-card__time__2w0XM"]"#.into(),
            next_button: r#"button[aria-label*="Next stories"]"#.into(),
        }
    }
}

impl Locators {
    pub fn results_container(&self) -> Locator {
        Locator::css(&self.results_container)
    }

    pub fn main_heading(&self) -> Locator {
        Locator::css(&self.main_heading)
    }

    pub fn result_count(&self) -> Locator {
        Locator::css(&self.result_count)
    }

    /// All result items on the current page.
    pub fn result_items(&self) -> Locator {
        Locator::css(&self.result_item)
    }

    /// The `index`-th (1-based) result item on the current page.
    pub fn item(&self, index: usize) -> Locator {
        self.result_items().nth(index)
    }

    pub fn media_container(&self, index: usize) -> Locator {
        self.item(index).then(&self.media_container)
    }

    pub fn video_badge(&self, index: usize) -> Locator {
        self.item(index)
            .then(&self.image_container)
            .then(&self.video_badge)
    }

    pub fn image(&self, index: usize, video: bool) -> Locator {
        let img = if video {
            &self.video_image
        } else {
            &self.still_image
        };
        self.item(index).then(&self.image_container).then(img)
    }

    pub fn headline(&self, index: usize, media: bool) -> Locator {
        let sel = if media {
            &self.media_headline
        } else {
            &self.text_headline
        };
        self.item(index).then(sel)
    }

    pub fn published(&self, index: usize, media: bool) -> Locator {
        let sel = if media {
            &self.media_time
        } else {
            &self.text_time
        };
        self.item(index).then(sel)
    }

    pub fn next_button(&self) -> Locator {
        Locator::css(&self.next_button)
    }
}

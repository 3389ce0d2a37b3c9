//! The catalog dashboard: gallery, admin tools, reviews.

use std::path::Path;

use tracing::{info, warn};

use crate::driver::ElementHandle;
use crate::pages::auth::{AuthPanel, Authenticate};
use crate::pages::outcome;
use crate::query::ElementQuery;
use crate::result::{HarnessError, HarnessResult};
use crate::session::Session;

/// Minimum number of catalog entries that must remain after a delete.
///
/// Automated runs share the deployed catalog; the guard keeps them from
/// draining it below a usable baseline.
pub const CATALOG_SAFETY_FLOOR: usize = 6;

/// Refuse a delete unless strictly more than the safety floor remain.
pub fn ensure_catalog_floor(count: usize) -> HarnessResult<()> {
    if count > CATALOG_SAFETY_FLOOR {
        Ok(())
    } else {
        Err(HarnessError::PreconditionFailed {
            action: "delete_last_car",
            reason: format!("{count} catalog entries visible, floor is {CATALOG_SAFETY_FLOOR}"),
        })
    }
}

/// Fields of the add-car form, minus the dynamically-rendered year dropdown
/// and the file upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarListing {
    /// Manufacturer
    pub make: String,
    /// Model name
    pub model: String,
    /// Director field
    pub director: String,
    /// Main settings field
    pub settings: String,
    /// Free-text description
    pub description: String,
}

impl CarListing {
    /// Create a listing with empty detail fields
    #[must_use]
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            director: String::new(),
            settings: String::new(),
            description: String::new(),
        }
    }

    /// Set the director field
    #[must_use]
    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = director.into();
        self
    }

    /// Set the main settings field
    #[must_use]
    pub fn with_settings(mut self, settings: impl Into<String>) -> Self {
        self.settings = settings.into();
        self
    }

    /// Set the description field
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The dashboard screen, composing the authentication capability
#[derive(Debug)]
pub struct DashboardPage<'s> {
    session: &'s Session,
    auth: AuthPanel,
    background: ElementQuery,
    branding_icon: ElementQuery,
    linkedin_icon: ElementQuery,
    add_car_link: ElementQuery,
    delete_buttons: ElementQuery,
    make_input: ElementQuery,
    model_input: ElementQuery,
    year_options: ElementQuery,
    director_input: ElementQuery,
    settings_input: ElementQuery,
    description_input: ElementQuery,
    image_input: ElementQuery,
    submit_button: ElementQuery,
    catalog_links: ElementQuery,
    review_input: ElementQuery,
    submit_review_button: ElementQuery,
    review_entries: ElementQuery,
    ai_review_button: ElementQuery,
    ai_review_input: ElementQuery,
}

impl<'s> DashboardPage<'s> {
    /// Bind the dashboard to a session
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            auth: AuthPanel::new(),
            background: ElementQuery::tag("body"),
            branding_icon: ElementQuery::class_name("branding-icon"),
            linkedin_icon: ElementQuery::xpath("//p/a/img[@class='linkedin-icon']"),
            add_car_link: ElementQuery::xpath("//nav/a[@href='/add_car']"),
            delete_buttons: ElementQuery::xpath(
                "//div[@class='car-item']/form/button[@class='btn btn-danger']",
            ),
            make_input: ElementQuery::xpath("//input[@id='make']"),
            model_input: ElementQuery::xpath("//input[@id='model']"),
            year_options: ElementQuery::xpath("//select/option"),
            director_input: ElementQuery::xpath("//input[@id='director']"),
            settings_input: ElementQuery::id("main_settings"),
            description_input: ElementQuery::xpath("//div/textarea[@name='description']"),
            image_input: ElementQuery::xpath("//input[@id='image_file']"),
            submit_button: ElementQuery::xpath("//input[@id='submit']"),
            catalog_links: ElementQuery::xpath("//div/div/div/a"),
            review_input: ElementQuery::xpath("//form/textarea"),
            submit_review_button: ElementQuery::id("submit"),
            review_entries: ElementQuery::xpath("//ul/li"),
            ai_review_button: ElementQuery::id("ai-review-button"),
            ai_review_input: ElementQuery::id("review-input"),
        }
    }

    /// Navigate to the gallery home
    pub async fn open(&self) -> HarnessResult<()> {
        self.session.open_home().await
    }

    /// Probe whether the add-car action is offered to the current user
    pub async fn is_add_car_visible(&self) -> HarnessResult<bool> {
        self.session.is_visible(&self.add_car_link).await
    }

    /// Probe whether any delete controls are offered to the current user
    pub async fn delete_controls_visible(&self) -> HarnessResult<bool> {
        let controls = self.session.wait_for_all(&self.delete_buttons).await?;
        Ok(!controls.is_empty())
    }

    /// Open the add-car form
    pub async fn open_add_car_form(&self) -> HarnessResult<()> {
        self.session.click(&self.add_car_link).await
    }

    /// Resolve the dynamically-rendered year dropdown options.
    ///
    /// The caller picks one and passes it to [`Self::add_car`]; selection is
    /// by clicking a concrete option element, not by value.
    pub async fn year_options(&self) -> HarnessResult<Vec<ElementHandle>> {
        self.session.wait_for_all(&self.year_options).await
    }

    /// Fill and submit the add-car form, then report whether the banner
    /// confirms the submitted make and model.
    pub async fn add_car(
        &self,
        listing: &CarListing,
        year: &ElementHandle,
        image: &Path,
    ) -> HarnessResult<bool> {
        info!(make = %listing.make, model = %listing.model, "adding car");
        self.session.fill(&self.make_input, &listing.make).await?;
        self.session.fill(&self.model_input, &listing.model).await?;
        self.session.click_element(year).await?;
        self.session
            .fill(&self.director_input, &listing.director)
            .await?;
        self.session
            .fill(&self.settings_input, &listing.settings)
            .await?;
        self.session
            .fill(&self.description_input, &listing.description)
            .await?;
        self.session.attach_file(&self.image_input, image).await?;
        self.session.click(&self.submit_button).await?;

        let banner = self.success_banner().await?;
        Ok(banner == outcome::car_added(&listing.make, &listing.model))
    }

    /// Delete the last catalog entry, reporting whether the banner confirms
    /// the deletion.
    ///
    /// Refuses to click at or below [`CATALOG_SAFETY_FLOOR`], returning
    /// `false` without touching the page.
    pub async fn delete_last_car(&self) -> HarnessResult<bool> {
        let controls = self.session.wait_for_all(&self.delete_buttons).await?;
        if let Err(err) = ensure_catalog_floor(controls.len()) {
            warn!(%err, "refusing delete");
            return Ok(false);
        }
        let Some(last) = controls.last() else {
            return Ok(false);
        };
        info!(count = controls.len(), "deleting last catalog entry");
        self.session.click_element(last).await?;

        let banner = self.success_banner().await?;
        Ok(banner == outcome::CAR_DELETED)
    }

    /// Computed background image of the gallery body
    pub async fn background_image(&self) -> HarnessResult<String> {
        self.session
            .css_value_of(&self.background, "background-image")
            .await
    }

    /// Source URL of the branding icon
    pub async fn branding_icon_src(&self) -> HarnessResult<Option<String>> {
        self.session.attribute_of(&self.branding_icon, "src").await
    }

    /// Click the LinkedIn icon, switch to the window it opens, and return
    /// that window's URL
    pub async fn open_linkedin_profile(&self) -> HarnessResult<String> {
        self.session.click(&self.linkedin_icon).await?;
        self.session.switch_to_secondary().await?;
        self.session.current_url().await
    }

    /// Open the detail view of the last catalog entry
    pub async fn open_last_car(&self) -> HarnessResult<()> {
        let links = self.session.wait_for_all(&self.catalog_links).await?;
        let Some(last) = links.last() else {
            return Err(self.none_matched(&self.catalog_links));
        };
        self.session.click_element(last).await
    }

    /// Fill and submit a manual review on the current car
    pub async fn submit_review(&self, review: &str) -> HarnessResult<()> {
        self.session.fill(&self.review_input, review).await?;
        self.session.click(&self.submit_review_button).await
    }

    /// Text of the newest entry in the users' review list
    pub async fn latest_review(&self) -> HarnessResult<String> {
        let entries = self.session.wait_for_all(&self.review_entries).await?;
        let Some(last) = entries.last() else {
            return Err(self.none_matched(&self.review_entries));
        };
        self.session.text_of_element(last).await
    }

    /// Trigger AI review generation and block until the input field is
    /// populated, returning the generated text.
    ///
    /// A field that renders but never fills surfaces as the distinct
    /// generation-timeout error, not as not-found.
    pub async fn request_ai_review(&self) -> HarnessResult<String> {
        info!("requesting AI review");
        self.session.click(&self.ai_review_button).await?;
        self.session.wait_for_value(&self.ai_review_input).await
    }

    /// Submit whatever currently fills the review input
    pub async fn submit_ai_review(&self) -> HarnessResult<()> {
        self.session.click(&self.submit_review_button).await
    }

    fn none_matched(&self, query: &ElementQuery) -> HarnessError {
        HarnessError::NotFound {
            query: query.to_string(),
            condition: "present",
            timeout_ms: self.session.element_policy().timeout_ms(),
        }
    }
}

impl Authenticate for DashboardPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn auth(&self) -> &AuthPanel {
        &self.auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod floor_tests {
        use super::*;

        #[test]
        fn at_the_floor_is_rejected() {
            let err = ensure_catalog_floor(CATALOG_SAFETY_FLOOR).unwrap_err();
            assert!(matches!(err, HarnessError::PreconditionFailed { .. }));
        }

        #[test]
        fn below_the_floor_is_rejected() {
            assert!(ensure_catalog_floor(0).is_err());
            assert!(ensure_catalog_floor(CATALOG_SAFETY_FLOOR - 1).is_err());
        }

        #[test]
        fn above_the_floor_is_allowed() {
            assert!(ensure_catalog_floor(CATALOG_SAFETY_FLOOR + 1).is_ok());
        }

        #[test]
        fn rejection_names_the_action() {
            let err = ensure_catalog_floor(3).unwrap_err();
            assert!(err.to_string().contains("delete_last_car"));
        }
    }

    mod listing_tests {
        use super::*;

        #[test]
        fn builder_fills_detail_fields() {
            let listing = CarListing::new("Tesla123", "ModelY456")
                .with_director("Auto Director 001")
                .with_settings("Auto Settings 001")
                .with_description("Auto Description 001");
            assert_eq!(listing.make, "Tesla123");
            assert_eq!(listing.model, "ModelY456");
            assert_eq!(listing.director, "Auto Director 001");
        }
    }
}

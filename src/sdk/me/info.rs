use chrono::NaiveDate;

use crate::{
    Result,
    sdk::{Image, model::resource},
};

resource!(
    /// Profile of the authorized user. Email and birthdate need the matching
    /// scopes and are `None` without them.
    UserInfo
);

impl UserInfo {
    pub fn id(&self) -> Option<&str> {
        self.model.str("id")
    }

    pub fn display_name(&self) -> Option<&str> {
        self.model.str("display_name")
    }

    pub fn has_display_name(&self) -> bool {
        self.display_name().is_some_and(|name| !name.is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.model.str("email")
    }

    pub fn country(&self) -> Option<&str> {
        self.model.str("country")
    }

    /// `premium`, `free`, ...
    pub fn product(&self) -> Option<&str> {
        self.model.str("product")
    }

    pub fn birthdate(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.model.str("birthdate")?, "%Y-%m-%d").ok()
    }

    pub fn followers(&self) -> Option<u64> {
        self.model.u64("followers.total")
    }

    pub fn images(&self) -> Result<Vec<Image>> {
        self.model.children("images")
    }

    pub fn spotify_uri(&self) -> Option<&str> {
        self.model.str("uri")
    }

    pub fn spotify_url(&self) -> Option<&str> {
        self.model.str("external_urls.spotify")
    }
}

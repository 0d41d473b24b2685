/// A sponsor as returned by the upstream source.
///
/// Sponsors have no stable identity here: they are addressed by their
/// position in the most recently fetched list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sponsor {
    pub name: String,
    pub login: String,
    pub avatar_url: String,
}

impl Sponsor {
    pub fn new<N, L, A>(name: N, login: L, avatar_url: A) -> Self
    where
        N: Into<String>,
        L: Into<String>,
        A: Into<String>,
    {
        Sponsor {
            name: name.into(),
            login: login.into(),
            avatar_url: avatar_url.into(),
        }
    }

    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.login)
    }
}

/// One page of sponsors plus the information needed to request the next one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SponsorPage {
    pub sponsors: Vec<Sponsor>,
    pub has_next_page: bool,
    // None when the upstream did not return a cursor (e.g. an empty result).
    pub end_cursor: Option<String>,
}

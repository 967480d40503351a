use serde::Deserialize;

/// List filters shared by every dashboard and public list view. All supplied
/// criteria must hold at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

fn clean(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty() && s != "all")
}

impl Filter {
    pub fn search(term: &str) -> Self {
        Self {
            search: Some(term.into()),
            ..default::default()
        }
    }

    /// Trims every criterion, lowercases the search term and drops empty or
    /// `all` values so they match everything.
    pub fn normalized(self) -> Self {
        Self {
            search: clean(self.search).map(|s| s.to_lowercase()),
            status: clean(self.status),
            kind: clean(self.kind),
            team: clean(self.team),
        }
    }

    /// `%term%` for SQL `ILIKE`, with the wildcard characters escaped.
    pub fn like_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !item.haystack().iter().any(|h| h.to_lowercase().contains(&term)) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if item.status() != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            if item.kind() != Some(kind.as_str()) {
                return false;
            }
        }
        if let Some(team) = &self.team {
            if !item.teams().iter().any(|t| t == team) {
                return false;
            }
        }
        true
    }
}

/// What a record exposes to [`Filter`].
pub trait Searchable {
    fn haystack(&self) -> Vec<&str>;

    fn status(&self) -> Option<&str> {
        None
    }

    fn kind(&self) -> Option<&str> {
        None
    }

    fn teams(&self) -> &[String] {
        &[]
    }
}

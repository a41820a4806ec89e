use std::fmt;

/// Label of the link action that opens an article.
pub const OPEN_LINK_LABEL: &str = "👉 點我打開";

/// The closed set of named actions.
///
/// Each has an ASCII identifier, written into postback payloads, and a
/// display label shown on buttons and accepted as typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Newest,
    DailyHot,
    MonthlyHot,
    YearHot,
    Random,
    ShowAllImages,
    Help,
}

impl ActionKind {
    pub const ALL: [Self; 7] = [
        Self::Newest,
        Self::DailyHot,
        Self::MonthlyHot,
        Self::YearHot,
        Self::Random,
        Self::ShowAllImages,
        Self::Help,
    ];

    /// Actions a user can trigger by typing their label.
    pub const TEXT_TRIGGERED: [Self; 5] = [
        Self::DailyHot,
        Self::MonthlyHot,
        Self::YearHot,
        Self::Random,
        Self::Help,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::DailyHot => "DailyHot",
            Self::MonthlyHot => "MonthlyHot",
            Self::YearHot => "YearHot",
            Self::Random => "Random",
            Self::ShowAllImages => "ShowAllImages",
            Self::Help => "Help",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Newest => "最新表特",
            Self::DailyHot => "📈 本日熱門",
            Self::MonthlyHot => "🔥 近期熱門",
            Self::YearHot => "🏆 年度熱門",
            Self::Random => "👩 隨機",
            Self::ShowAllImages => "打開圖片",
            Self::Help => "||| 選單",
        }
    }

    /// Resolve an identifier or a display label. Older payloads carried
    /// the label, so both are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s || kind.label() == s)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A routed action with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Newest { page: u32 },
    DailyHot,
    MonthlyHot,
    YearHot,
    Random,
    ShowAllImages { article_id: String },
    Help,
    /// Free text that matched no action label.
    KeywordSearch { keyword: String },
}

impl Action {
    /// The named action, or `None` for keyword searches.
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::Newest { .. } => Some(ActionKind::Newest),
            Self::DailyHot => Some(ActionKind::DailyHot),
            Self::MonthlyHot => Some(ActionKind::MonthlyHot),
            Self::YearHot => Some(ActionKind::YearHot),
            Self::Random => Some(ActionKind::Random),
            Self::ShowAllImages { .. } => Some(ActionKind::ShowAllImages),
            Self::Help => Some(ActionKind::Help),
            Self::KeywordSearch { .. } => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Newest { page } => write!(f, "Newest(page={page})"),
            Self::ShowAllImages { article_id } => write!(f, "ShowAllImages({article_id})"),
            Self::KeywordSearch { keyword } => write!(f, "KeywordSearch({keyword})"),
            other => match other.kind() {
                Some(kind) => f.write_str(kind.id()),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_id_and_label() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::parse(kind.id()), Some(kind));
            assert_eq!(ActionKind::parse(kind.label()), Some(kind));
        }
        assert_eq!(ActionKind::parse("newest"), None);
        assert_eq!(ActionKind::parse(""), None);
    }

    #[test]
    fn ids_are_ascii() {
        assert!(ActionKind::ALL.iter().all(|k| k.id().is_ascii()));
    }

    #[test]
    fn display_includes_params() {
        assert_eq!(Action::Newest { page: 3 }.to_string(), "Newest(page=3)");
        assert_eq!(Action::YearHot.to_string(), "YearHot");
        assert_eq!(
            Action::KeywordSearch {
                keyword: "台北".into()
            }
            .to_string(),
            "KeywordSearch(台北)"
        );
    }
}

//! Postback payload codec.
//!
//! Payloads are flat query strings (`action=Newest&page=3`). They are sent
//! to the client inside template actions and echoed back verbatim on tap,
//! which is the only way state survives between requests.

use url::form_urlencoded;

use crate::action::ActionKind;

pub const KEY_ACTION: &str = "action";
pub const KEY_PAGE: &str = "page";
pub const KEY_ARTICLE_ID: &str = "article_id";

/// The `{action, page}` pair carried by pagination buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationToken {
    pub action: ActionKind,
    pub page: u32,
}

impl PaginationToken {
    pub fn new(action: ActionKind, page: u32) -> Self {
        Self { action, page }
    }

    /// The page before this one, floored at 0.
    pub fn previous(self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            ..self
        }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self
        }
    }

    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(KEY_ACTION, self.action.id())
            .append_pair(KEY_PAGE, &self.page.to_string())
            .finish()
    }

    /// The token carried by parsed payload params. `None` unless the action
    /// names a known action; the page follows [`PageParam`] rules.
    pub fn from_params(params: &PostbackParams) -> Option<Self> {
        let action = ActionKind::parse(params.action.as_deref()?)?;
        Some(Self {
            action,
            page: params.page.page(),
        })
    }
}

/// Payload for a parameterless action.
pub fn encode_action(action: ActionKind) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(KEY_ACTION, action.id())
        .finish()
}

/// Payload asking for every image of one article.
pub fn encode_show_images(article_id: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(KEY_ACTION, ActionKind::ShowAllImages.id())
        .append_pair(KEY_ARTICLE_ID, article_id)
        .finish()
}

/// Outcome of reading the `page` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageParam {
    Missing,
    Valid(u32),
    /// A negative number; treated as page 0.
    Negative(i64),
    /// Not a number, or too large. Treated as page 0.
    Invalid(String),
}

impl PageParam {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Missing;
        };
        match raw.trim().parse::<i64>() {
            Ok(n) if n < 0 => Self::Negative(n),
            Ok(n) => u32::try_from(n).map_or_else(|_| Self::Invalid(raw.to_string()), Self::Valid),
            Err(_) => Self::Invalid(raw.to_string()),
        }
    }

    pub fn page(&self) -> u32 {
        match self {
            Self::Valid(page) => *page,
            Self::Missing | Self::Negative(_) | Self::Invalid(_) => 0,
        }
    }

    /// The key was present but did not hold a non-negative page number.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Negative(_) | Self::Invalid(_))
    }
}

/// The recognized keys of a postback payload. Unknown keys are ignored;
/// for repeated keys the first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostbackParams {
    pub action: Option<String>,
    pub page: PageParam,
    pub article_id: Option<String>,
}

impl PostbackParams {
    pub fn parse(data: &str) -> Self {
        let mut action = None;
        let mut page = None;
        let mut article_id = None;
        for (key, value) in form_urlencoded::parse(data.as_bytes()) {
            let slot = match &*key {
                KEY_ACTION => &mut action,
                KEY_PAGE => &mut page,
                KEY_ARTICLE_ID => &mut article_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        Self {
            action,
            page: PageParam::parse(page.as_deref()),
            article_id,
        }
    }
}

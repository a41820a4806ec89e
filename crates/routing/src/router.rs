use std::fmt;

use {
    pttbot_common::EventKind,
    tracing::{debug, warn},
};

use crate::{
    action::{Action, ActionKind},
    postback::{PaginationToken, PostbackParams},
};

/// Routing outcome for one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dispatch(Action),
    /// Dropped without a reply.
    Ignore(Ignored),
}

/// Why an event produced no action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ignored {
    /// Postback without an `action` key.
    MissingAction,
    UnknownAction(String),
    /// `ShowAllImages` postback without an `article_id`.
    MissingArticleId,
    /// Not a text message or postback.
    UnsupportedEvent(String),
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAction => write!(f, "postback has no action"),
            Self::UnknownAction(action) => write!(f, "unknown action '{action}'"),
            Self::MissingArticleId => write!(f, "postback has no article id"),
            Self::UnsupportedEvent(kind) => write!(f, "unsupported event '{kind}'"),
        }
    }
}

/// Map an inbound event to an action.
pub fn route(event: &EventKind) -> Route {
    match event {
        EventKind::Text(text) => Route::Dispatch(route_text(text)),
        EventKind::Postback(data) => route_postback(data),
        EventKind::Other(kind) => Route::Ignore(Ignored::UnsupportedEvent(kind.clone())),
    }
}

/// A reserved label selects its action; any other text is a keyword.
pub fn route_text(text: &str) -> Action {
    let reserved = ActionKind::TEXT_TRIGGERED
        .into_iter()
        .find(|kind| kind.id() == text || kind.label() == text);
    match reserved {
        Some(ActionKind::DailyHot) => Action::DailyHot,
        Some(ActionKind::MonthlyHot) => Action::MonthlyHot,
        Some(ActionKind::YearHot) => Action::YearHot,
        Some(ActionKind::Random) => Action::Random,
        Some(ActionKind::Help) => Action::Help,
        Some(ActionKind::Newest | ActionKind::ShowAllImages) | None => Action::KeywordSearch {
            keyword: text.to_string(),
        },
    }
}

pub fn route_postback(data: &str) -> Route {
    let params = PostbackParams::parse(data);
    let Some(raw_action) = params.action.as_deref() else {
        return Route::Ignore(Ignored::MissingAction);
    };
    let Some(kind) = ActionKind::parse(raw_action) else {
        return Route::Ignore(Ignored::UnknownAction(raw_action.to_string()));
    };
    debug!(action = %kind, "postback action");

    let action = match kind {
        ActionKind::Newest => {
            if params.page.is_malformed() {
                warn!(page = ?params.page, "malformed page parameter, using page 0");
            }
            match PaginationToken::from_params(&params) {
                Some(token) => Action::Newest { page: token.page },
                None => return Route::Ignore(Ignored::UnknownAction(raw_action.to_string())),
            }
        },
        ActionKind::ShowAllImages => match params.article_id {
            Some(article_id) if !article_id.is_empty() => Action::ShowAllImages { article_id },
            _ => return Route::Ignore(Ignored::MissingArticleId),
        },
        ActionKind::DailyHot => Action::DailyHot,
        ActionKind::MonthlyHot => Action::MonthlyHot,
        ActionKind::YearHot => Action::YearHot,
        ActionKind::Random => Action::Random,
        ActionKind::Help => Action::Help,
    };
    Route::Dispatch(action)
}

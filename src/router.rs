/// Dispatch for keyboard commands and popup messages
use serde::{Deserialize, Serialize};

use crate::error::OrganizerError;
use crate::host::Host;
use crate::organizer::TabOrganizer;
use crate::tab_data::{HistoryEntry, SessionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OrganizeTabs,
    SaveSession,
}

impl Command {
    /// Map a `commands.onCommand` name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Command> {
        match name {
            "organize-tabs" => Some(Command::OrganizeTabs),
            "save-session" => Some(Command::SaveSession),
            _ => None,
        }
    }
}

/// Every `action` a popup request may carry
pub const MESSAGE_ACTIONS: [&str; 6] = [
    "organizeNow",
    "saveSession",
    "restoreSession",
    "getHistory",
    "getSessions",
    "deleteSession",
];

/// A popup request, discriminated by its `action` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    OrganizeNow,
    SaveSession {
        #[serde(default)]
        name: Option<String>,
    },
    RestoreSession {
        #[serde(default)]
        session: Option<SessionRecord>,
    },
    GetHistory,
    GetSessions,
    DeleteSession {
        #[serde(default)]
        index: Option<i64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Status {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        session: Option<SessionRecord>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    History {
        history: Vec<HistoryEntry>,
    },
    Sessions {
        sessions: Vec<SessionRecord>,
    },
}

impl Response {
    pub fn ok() -> Response {
        Response::Status {
            success: true,
            session: None,
            error: None,
        }
    }

    pub fn saved(session: SessionRecord) -> Response {
        Response::Status {
            success: true,
            session: Some(session),
            error: None,
        }
    }

    pub fn failed(error: &OrganizerError) -> Response {
        Response::Status {
            success: false,
            session: None,
            error: Some(error.to_string()),
        }
    }

    fn from_result(result: Result<(), OrganizerError>) -> Response {
        match result {
            Ok(()) => Response::ok(),
            Err(e) => Response::failed(&e),
        }
    }
}

pub async fn handle_command<H: Host>(organizer: &TabOrganizer<H>, command: Command) {
    match command {
        Command::OrganizeTabs => {
            if let Err(e) = organizer.grouper().organize_all().await {
                log::error!("Error organizing existing tabs: {}", e);
            }
        }
        Command::SaveSession => {
            if let Err(e) = organizer.sessions().save(None).await {
                log::error!("Error saving session from shortcut: {}", e);
            }
        }
    }
}

pub async fn dispatch<H: Host>(organizer: &TabOrganizer<H>, request: Request) -> Response {
    match request {
        Request::OrganizeNow => Response::from_result(organizer.grouper().organize_all().await),
        Request::SaveSession { name } => match organizer.sessions().save(name.as_deref()).await {
            Ok(session) => Response::saved(session),
            Err(e) => Response::failed(&e),
        },
        Request::RestoreSession { session } => {
            Response::from_result(organizer.sessions().restore(session.as_ref()).await)
        }
        Request::GetHistory => match organizer.history().list().await {
            Ok(history) => Response::History { history },
            Err(e) => {
                log::error!("Error reading history: {}", e);
                Response::History {
                    history: Vec::new(),
                }
            }
        },
        Request::GetSessions => match organizer.sessions().list().await {
            Ok(sessions) => Response::Sessions { sessions },
            Err(e) => {
                log::error!("Error reading sessions: {}", e);
                Response::Sessions {
                    sessions: Vec::new(),
                }
            }
        },
        Request::DeleteSession { index } => match index {
            Some(index) => Response::from_result(organizer.sessions().delete(index).await),
            None => Response::ok(),
        },
    }
}

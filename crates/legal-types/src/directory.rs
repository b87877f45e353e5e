//! Read-only lookup of cases and clients
//!
//! Components that need practice data take a `&dyn Directory` (or a generic
//! `D: Directory`) instead of reaching for shared module-level lists.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::billing::{non_blank, CaseReference, PartyInfo};

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to parse directory: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Case {case_id} references unknown client {client_id}")]
    UnknownClient { case_id: String, client_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    pub case_number: String,
    pub title: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
}

impl CaseRecord {
    pub fn to_reference(&self) -> CaseReference {
        CaseReference {
            case_number: non_blank(Some(&self.case_number)).map(str::to_string),
            title: non_blank(Some(&self.title)).map(str::to_string),
            court: non_blank(self.court.as_deref()).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl ClientRecord {
    pub fn to_party(&self) -> PartyInfo {
        PartyInfo {
            name: Some(self.name.clone()),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }
}

/// Read-only access to the practice's cases and clients
pub trait Directory {
    fn case(&self, id: &str) -> Option<&CaseRecord>;

    fn client(&self, id: &str) -> Option<&ClientRecord>;

    fn cases(&self) -> Vec<&CaseRecord>;

    fn clients(&self) -> Vec<&ClientRecord>;

    /// Client linked to a case, if the case names one that exists
    fn client_for_case(&self, case_id: &str) -> Option<&ClientRecord> {
        let client_id = self.case(case_id)?.client_id.as_deref()?;
        self.client(client_id)
    }
}

/// JSON shape accepted by [`InMemoryDirectory::from_json`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryFile {
    #[serde(default)]
    cases: Vec<CaseRecord>,
    #[serde(default)]
    clients: Vec<ClientRecord>,
}

/// Directory backed by in-memory maps; insertion order is kept for listings
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    cases: Vec<CaseRecord>,
    clients: Vec<ClientRecord>,
    case_index: HashMap<String, usize>,
    client_index: HashMap<String, usize>,
}

impl InMemoryDirectory {
    pub fn new(
        cases: Vec<CaseRecord>,
        clients: Vec<ClientRecord>,
    ) -> Result<Self, DirectoryError> {
        let mut client_index = HashMap::with_capacity(clients.len());
        for (i, client) in clients.iter().enumerate() {
            if client_index.insert(client.id.clone(), i).is_some() {
                return Err(DirectoryError::DuplicateId {
                    kind: "client",
                    id: client.id.clone(),
                });
            }
        }

        let mut case_index = HashMap::with_capacity(cases.len());
        for (i, case) in cases.iter().enumerate() {
            if case_index.insert(case.id.clone(), i).is_some() {
                return Err(DirectoryError::DuplicateId {
                    kind: "case",
                    id: case.id.clone(),
                });
            }
            if let Some(client_id) = &case.client_id {
                if !client_index.contains_key(client_id) {
                    return Err(DirectoryError::UnknownClient {
                        case_id: case.id.clone(),
                        client_id: client_id.clone(),
                    });
                }
            }
        }

        Ok(Self {
            cases,
            clients,
            case_index,
            client_index,
        })
    }

    /// Parse `{"cases": [...], "clients": [...]}`
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let file: DirectoryFile = serde_json::from_str(json)?;
        Self::new(file.cases, file.clients)
    }

    /// Mock practice data shown by the front-end before a backend exists
    pub fn sample() -> Self {
        let clients = vec![
            ClientRecord {
                id: "client-1".into(),
                name: "Rajesh Kumar".into(),
                email: Some("rajesh.kumar@example.com".into()),
                phone: Some("+91 98765 43210".into()),
                address: Some("12 MG Road, Bengaluru".into()),
            },
            ClientRecord {
                id: "client-2".into(),
                name: "Priya Enterprises Pvt. Ltd.".into(),
                email: Some("legal@priya-enterprises.example".into()),
                phone: None,
                address: Some("44 Nariman Point, Mumbai".into()),
            },
            ClientRecord {
                id: "client-3".into(),
                name: "Anita Desai".into(),
                email: None,
                phone: Some("+91 91234 56789".into()),
                address: None,
            },
        ];
        let cases = vec![
            CaseRecord {
                id: "case-1".into(),
                case_number: "CS/1042/2025".into(),
                title: "Kumar v. Horizon Builders".into(),
                client_id: Some("client-1".into()),
                court: Some("Bengaluru City Civil Court".into()),
            },
            CaseRecord {
                id: "case-2".into(),
                case_number: "ARB/77/2025".into(),
                title: "Priya Enterprises v. Coastal Logistics".into(),
                client_id: Some("client-2".into()),
                court: None,
            },
            CaseRecord {
                id: "case-3".into(),
                case_number: "FC/310/2024".into(),
                title: "In re Desai Family Settlement".into(),
                client_id: Some("client-3".into()),
                court: Some("Family Court, Pune".into()),
            },
        ];

        // Ids are unique and every client_id resolves
        Self::new(cases, clients).unwrap_or_default()
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

impl Directory for InMemoryDirectory {
    fn case(&self, id: &str) -> Option<&CaseRecord> {
        self.case_index.get(id).map(|&i| &self.cases[i])
    }

    fn client(&self, id: &str) -> Option<&ClientRecord> {
        self.client_index.get(id).map(|&i| &self.clients[i])
    }

    fn cases(&self) -> Vec<&CaseRecord> {
        self.cases.iter().collect()
    }

    fn clients(&self) -> Vec<&ClientRecord> {
        self.clients.iter().collect()
    }
}

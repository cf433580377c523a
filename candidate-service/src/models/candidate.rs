use serde::{Deserialize, Serialize};

/// A stored candidate. The primary key is the name itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "CandidateName")]
    pub candidate_name: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            candidate_name: name,
        }
    }

    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            candidate_name: self.candidate_name.clone(),
        }
    }
}

/// Name-only projection returned by every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CandidateSummary {
    #[serde(rename = "CandidateName")]
    pub candidate_name: String,
}

impl From<Candidate> for CandidateSummary {
    fn from(candidate: Candidate) -> Self {
        Self {
            candidate_name: candidate.candidate_name,
        }
    }
}

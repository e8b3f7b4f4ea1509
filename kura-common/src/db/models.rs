//! Registrant record models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The two kinds of registration record
///
/// Both share the same fields; aspirants additionally carry a [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Member,
    Aspirant,
}

impl RecordKind {
    /// Table holding records of this kind
    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Member => "members",
            RecordKind::Aspirant => "aspirants",
        }
    }

    /// Capitalised name used in response messages ("Member registered successfully")
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Member => "Member",
            RecordKind::Aspirant => "Aspirant",
        }
    }

    /// Key under which a single record is returned in response bodies
    pub fn response_key(self) -> &'static str {
        match self {
            RecordKind::Member => "member",
            RecordKind::Aspirant => "aspirant",
        }
    }

    pub fn requires_position(self) -> bool {
        matches!(self, RecordKind::Aspirant)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.response_key())
    }
}

/// Elective position an aspirant is running for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Presidency,
    Governor,
    Senator,
    #[serde(rename = "MP")]
    MemberOfParliament,
    #[serde(rename = "Women Rep")]
    WomenRepresentative,
    #[serde(rename = "MCA")]
    CountyAssemblyMember,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Presidency,
        Position::Governor,
        Position::Senator,
        Position::MemberOfParliament,
        Position::WomenRepresentative,
        Position::CountyAssemblyMember,
    ];

    /// Stored and wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Presidency => "Presidency",
            Position::Governor => "Governor",
            Position::Senator => "Senator",
            Position::MemberOfParliament => "MP",
            Position::WomenRepresentative => "Women Rep",
            Position::CountyAssemblyMember => "MCA",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid position: {}", s)))
    }
}

/// Validated registration fields, ready to persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub national_id: String,
    pub mobile: String,
    pub email: String,
    pub county: String,
    pub constituency: String,
    pub ward: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// A persisted member or aspirant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    pub id: String,
    pub name: String,
    pub national_id: String,
    pub mobile: String,
    pub email: String,
    pub county: String,
    pub constituency: String,
    pub ward: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// RFC 3339, microsecond precision
    pub created_at: String,
    pub updated_at: String,
}

impl Registrant {
    /// The submitted fields of this record, without id and timestamps
    pub fn form(&self) -> RegistrationForm {
        RegistrationForm {
            name: self.name.clone(),
            national_id: self.national_id.clone(),
            mobile: self.mobile.clone(),
            email: self.email.clone(),
            county: self.county.clone(),
            constituency: self.constituency.clone(),
            ward: self.ward.clone(),
            position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_wire_values() {
        for position in Position::ALL {
            let json = serde_json::to_value(position).unwrap();
            assert_eq!(json, position.as_str());
            assert_eq!(position.as_str().parse::<Position>().unwrap(), position);
        }
        assert_eq!(serde_json::to_value(Position::WomenRepresentative).unwrap(), "Women Rep");
    }

    #[test]
    fn test_position_rejects_unknown() {
        assert!(matches!("President".parse::<Position>(), Err(Error::InvalidInput(_))));
        assert!("mp".parse::<Position>().is_err());
    }

    #[test]
    fn test_registrant_serialises_camel_case() {
        let registrant = Registrant {
            id: "abc".to_string(),
            name: "Achieng Otieno".to_string(),
            national_id: "12345678".to_string(),
            mobile: "0712345678".to_string(),
            email: "achieng@example.com".to_string(),
            county: "Nairobi".to_string(),
            constituency: "Westlands".to_string(),
            ward: "Kitisuru".to_string(),
            position: None,
            created_at: "2026-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000000Z".to_string(),
        };

        let json = serde_json::to_value(&registrant).unwrap();
        assert_eq!(json["nationalId"], "12345678");
        assert_eq!(json["createdAt"], "2026-01-01T00:00:00.000000Z");
        assert!(json.get("position").is_none());

        let aspirant = Registrant {
            position: Some(Position::Governor),
            ..registrant
        };
        let json = serde_json::to_value(&aspirant).unwrap();
        assert_eq!(json["position"], "Governor");
    }

    #[test]
    fn test_record_kind_names() {
        assert_eq!(RecordKind::Member.table(), "members");
        assert_eq!(RecordKind::Aspirant.table(), "aspirants");
        assert_eq!(RecordKind::Aspirant.label(), "Aspirant");
        assert!(RecordKind::Aspirant.requires_position());
        assert!(!RecordKind::Member.requires_position());
    }
}

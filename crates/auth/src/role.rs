use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role.
///
/// - `Owner`: full control, including payment marking.
/// - `Auditor`: read/approve everywhere, but cannot mark payment.
/// - `Staff`: scoped to self-created orders and self-assigned resources.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Owner,
    Auditor,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Auditor => "AUDITOR",
            Role::Staff => "STAFF",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNER" => Ok(Role::Owner),
            "AUDITOR" => Ok(Role::Auditor),
            "STAFF" => Ok(Role::Staff),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_uppercase_names() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"OWNER\"");
        let r: Role = serde_json::from_str("\"STAFF\"").unwrap();
        assert_eq!(r, Role::Staff);
    }

    #[test]
    fn from_str_round_trips() {
        for role in [Role::Owner, Role::Auditor, Role::Staff] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
}

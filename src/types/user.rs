use serde::{Deserialize, Serialize};

/// Server identifiers are positive; locally created rows use negative ids
/// until the server confirms them.
pub type UserId = i64;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

impl User {
    /// True while the row only exists locally.
    pub fn is_pending(&self) -> bool {
        self.id < 0
    }

    /// Build the local placeholder shown while a create request is in flight.
    pub fn local(id: UserId, new_user: &NewUser) -> Self {
        Self {
            id,
            name: new_user.name.clone(),
            username: None,
            email: new_user.email.clone(),
            phone: new_user.phone.clone(),
            website: None,
            address: new_user.address.clone(),
            company: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

impl Address {
    /// Single-line rendering: street, suite, city, zipcode.
    pub fn one_line(&self) -> String {
        [&self.street, &self.suite, &self.city, &self.zipcode]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase", default, skip_serializing_if = "Option::is_none")]
    pub catch_phrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bs: Option<String>,
}

/// Body of a create request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    }"#;

    #[test]
    fn test_deserialize_full_record() {
        let user: User = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username.as_deref(), Some("Bret"));
        let address = user.address.as_ref().unwrap();
        assert_eq!(address.one_line(), "Kulas Light Apt. 556 Gwenborough 92998-3874");
        assert_eq!(
            user.company.unwrap().catch_phrase.as_deref(),
            Some("Multi-layered client-server neural-net")
        );
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let user: User =
            serde_json::from_str(r#"{"id": 11, "name": "Ann", "email": "ann@example.com"}"#)
                .unwrap();
        assert!(user.address.is_none());
        assert_eq!(user.phone, "");
        assert!(!user.is_pending());
    }

    #[test]
    fn test_local_record_is_pending() {
        let new_user = NewUser {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            phone: "5550100".to_string(),
            address: None,
        };
        let user = User::local(-1, &new_user);
        assert!(user.is_pending());
        assert_eq!(user.name, "Ann");
    }

    #[test]
    fn test_one_line_skips_empty_parts() {
        let address = Address {
            street: "Main St".to_string(),
            city: "Springfield".to_string(),
            ..Address::default()
        };
        assert_eq!(address.one_line(), "Main St Springfield");
    }
}

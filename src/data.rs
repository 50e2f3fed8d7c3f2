//! Clinic dataset: JSON file format and the seeded demo data
//!
//! ```json
//! { "clinics": { "Downtown": { "clients": [], "orders": [], "resources": [] } } }
//! ```

use crate::collaborator::Directory;
use crate::error::Result;
use crate::records::{Client, Order, OrderStatus, Resource};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicRecords {
    pub clients: Vec<Client>,
    pub orders: Vec<Order>,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicData {
    pub clinics: BTreeMap<String, ClinicRecords>,
}

/// One collaborator per record kind, all scoped by clinic
#[derive(Clone)]
pub struct Directories {
    pub clients: Arc<Directory<Client>>,
    pub orders: Arc<Directory<Order>>,
    pub resources: Arc<Directory<Resource>>,
}

impl ClinicData {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let data: ClinicData = serde_json::from_str(&text)?;
        tracing::info!(path = %path.display(), clinics = data.clinics.len(), "loaded clinic data");
        Ok(data)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn clinic(&self, name: &str) -> Option<&ClinicRecords> {
        self.clinics.get(name)
    }

    pub fn clinic_names(&self) -> impl Iterator<Item = &str> {
        self.clinics.keys().map(String::as_str)
    }

    /// Build the in-memory collaborators
    pub fn directories(&self, latency: Duration) -> Directories {
        let clients = Directory::new().with_latency(latency);
        let orders = Directory::new().with_latency(latency);
        let resources = Directory::new().with_latency(latency);

        for (name, records) in &self.clinics {
            clients.insert_scope(name.as_str(), records.clients.clone());
            orders.insert_scope(name.as_str(), records.orders.clone());
            resources.insert_scope(name.as_str(), records.resources.clone());
        }

        Directories {
            clients: Arc::new(clients),
            orders: Arc::new(orders),
            resources: Arc::new(resources),
        }
    }

    /// Seeded demo dataset with two clinics
    pub fn sample() -> Self {
        let downtown_clients = vec![
            Client::new(1, "John", "Smith")
                .with_email("j.smith@mail.test")
                .with_phone("555-0101"),
            Client::new(2, "Mary", "Johnson")
                .with_email("mary.j@mail.test")
                .with_phone("555-0102"),
            Client::new(3, "Ann", "Lee").with_email("ann.lee@mail.test"),
            Client::new(4, "Johnny", "Appleseed").with_phone("555-0104"),
            Client::new(5, "Priya", "Natarajan")
                .with_email("priya@mail.test")
                .with_phone("555-0105"),
            Client::new(6, "Carlos", "Ruiz").with_email("c.ruiz@mail.test"),
            Client::new(7, "Fatima", "Haddad").with_phone("555-0107"),
            Client::new(8, "Wei", "Chen")
                .with_email("wei.chen@mail.test")
                .with_phone("555-0108"),
            Client::new(9, "Olga", "Petrova").with_email("olga@mail.test"),
            Client::new(10, "Samuel", "Okafor").with_phone("555-0110"),
        ];

        let uptown_clients = vec![
            Client::new(101, "Elena", "Rossi").with_email("elena@mail.test"),
            Client::new(102, "John", "Baker").with_phone("555-0202"),
            Client::new(103, "Aiko", "Tanaka").with_email("aiko@mail.test"),
        ];

        let order = |id: i64, number: &str, client: &str, status, cents, day| Order {
            id: id.into(),
            order_number: number.to_string(),
            client_name: client.to_string(),
            status,
            total_cents: cents,
            created_at: Utc
                .with_ymd_and_hms(2024, 3, day, 9, 30, 0)
                .single()
                .unwrap_or_default(),
        };

        let downtown_orders = vec![
            order(1001, "ORD-1001", "John Smith", OrderStatus::Paid, 12_000, 1),
            order(1002, "ORD-1002", "Mary Johnson", OrderStatus::Pending, 4_550, 2),
            order(1003, "ORD-1003", "Ann Lee", OrderStatus::Paid, 9_900, 4),
            order(1004, "ORD-1004", "Johnny Appleseed", OrderStatus::Cancelled, 2_000, 5),
            order(1005, "ORD-1005", "Wei Chen", OrderStatus::Pending, 18_250, 7),
            order(1006, "ORD-1006", "Priya Natarajan", OrderStatus::Paid, 7_300, 8),
            order(1007, "ORD-1007", "Carlos Ruiz", OrderStatus::Paid, 3_100, 11),
            order(1008, "ORD-1008", "John Smith", OrderStatus::Pending, 6_400, 12),
        ];

        let uptown_orders = vec![
            order(2001, "ORD-2001", "Elena Rossi", OrderStatus::Paid, 15_000, 3),
            order(2002, "ORD-2002", "John Baker", OrderStatus::Pending, 5_000, 6),
        ];

        let resource = |id: &str, name: &str, kind: &str, location: Option<&str>| Resource {
            id: id.into(),
            name: name.to_string(),
            kind: kind.to_string(),
            location: location.map(str::to_string),
        };

        let downtown_resources = vec![
            resource("r-1", "Exam Room 1", "room", Some("Ground floor")),
            resource("r-2", "Exam Room 2", "room", Some("Ground floor")),
            resource("r-3", "Ultrasound", "device", Some("Imaging")),
            resource("r-4", "X-Ray", "device", Some("Imaging")),
            resource("r-5", "Dr. Johanna Weiss", "practitioner", None),
            resource("r-6", "Dr. Amir Khan", "practitioner", None),
        ];

        let uptown_resources = vec![
            resource("u-1", "Consult Room", "room", Some("Level 2")),
            resource("u-2", "Dr. Lena Vogel", "practitioner", None),
        ];

        let mut clinics = BTreeMap::new();
        clinics.insert(
            "Downtown".to_string(),
            ClinicRecords {
                clients: downtown_clients,
                orders: downtown_orders,
                resources: downtown_resources,
            },
        );
        clinics.insert(
            "Uptown".to_string(),
            ClinicRecords {
                clients: uptown_clients,
                orders: uptown_orders,
                resources: uptown_resources,
            },
        );

        Self { clinics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::{Collaborator, FetchRequest};

    #[test]
    fn save_and_load_preserve_the_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinics.json");

        let data = ClinicData::sample();
        data.save(&path).unwrap();
        assert_eq!(ClinicData::load(&path).unwrap(), data);
    }

    #[test]
    fn directories_are_scoped_per_clinic() {
        let dirs = ClinicData::sample().directories(Duration::ZERO);
        assert_eq!(dirs.clients.scope_len("Downtown"), Some(10));
        assert_eq!(dirs.clients.scope_len("Uptown"), Some(3));

        let uptown = dirs
            .clients
            .fetch(&FetchRequest::new("Uptown").search("john"))
            .unwrap();
        assert_eq!(uptown.records.len(), 1);
        assert_eq!(uptown.records[0].last_name, "Baker");
    }

    #[test]
    fn clinic_names_are_sorted() {
        let data = ClinicData::sample();
        let names: Vec<&str> = data.clinic_names().collect();
        assert_eq!(names, vec!["Downtown", "Uptown"]);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ClinicData::load(&path).unwrap_err();
        assert!(matches!(err, crate::error::CliniPickError::DataParse(_)));
    }
}

//! Integration tests for the file-backed pipeline.
//!
//! Tests: Desk → JsonFileStore → files on disk → reopened Desk
//!
//! Verifies:
//! - Missing files are created with their default content
//! - Every mutation is visible in the file immediately afterwards
//! - Corrupt files stop startup and are left untouched

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use serde_json::Value;
    use tempfile::{tempdir, TempDir};

    use stockroom_auth::Role;
    use stockroom_inventory::NewItem;

    use crate::config::StoreConfig;
    use crate::desk::FileDesk;
    use crate::error::StoreError;

    struct Scratch {
        dir: TempDir,
    }

    impl Scratch {
        fn new() -> Self {
            Self {
                dir: tempdir().unwrap(),
            }
        }

        fn config(&self) -> StoreConfig {
            StoreConfig::in_dir(self.dir.path())
        }

        fn read_json(&self, path: &PathBuf) -> Value {
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
        }
    }

    #[test]
    fn first_open_writes_default_files() {
        let scratch = Scratch::new();
        let config = scratch.config();
        let desk = FileDesk::open_files(&config).unwrap();

        let users = scratch.read_json(&config.users_file);
        let names: Vec<_> = users.as_object().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["admin", "manager", "staff"]);
        assert_eq!(users["admin"]["password"], "admin");
        assert_eq!(users["staff"]["role"], "staff");

        assert_eq!(scratch.read_json(&config.inventory_file), serde_json::json!([]));
        assert!(desk.inventory().is_empty());
        assert_eq!(desk.authenticate("admin", "admin").unwrap().role, Role::Admin);
        assert!(desk.authenticate("admin", "wrong").is_err());
    }

    #[test]
    fn widget_lifecycle_is_persisted_after_each_step() {
        let scratch = Scratch::new();
        let config = scratch.config();
        let mut desk = FileDesk::open_files(&config).unwrap();
        let manager = desk.authenticate("manager", "manager").unwrap();

        desk.add_item(&manager, NewItem::new("widget", 10, 2.50)).unwrap();
        let items = scratch.read_json(&config.inventory_file);
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["name"], "widget");
        assert_eq!(items[0]["quantity"], 10);
        assert_eq!(items[0]["price"], 2.5);

        desk.adjust_quantity(&manager, "widget", -3, "sale").unwrap();
        assert_eq!(desk.inventory().find("widget").unwrap().quantity, 7);
        assert_eq!(scratch.read_json(&config.inventory_file)[0]["quantity"], 7);

        desk.remove_item(&manager, "widget").unwrap();
        assert!(desk.inventory().is_empty());
        assert_eq!(scratch.read_json(&config.inventory_file), serde_json::json!([]));
    }

    #[test]
    fn reopening_sees_previous_session() {
        let scratch = Scratch::new();
        let config = scratch.config();
        {
            let mut desk = FileDesk::open_files(&config).unwrap();
            let admin = desk.authenticate("admin", "admin").unwrap();
            desk.add_item(&admin, NewItem::new("bolt", 100, 0.05).with_category("Hardware"))
                .unwrap();
            desk.add_user(&admin, "dana", "Dana Doe", "danapw", Role::Staff).unwrap();
        }

        let desk = FileDesk::open_files(&config).unwrap();
        let bolt = desk.inventory().find("bolt").unwrap();
        assert_eq!(bolt.category, "Hardware");
        assert_eq!(bolt.added_by.as_deref(), Some("admin"));
        let dana = desk.authenticate("dana", "danapw").unwrap();
        assert_eq!(dana.full_name, "Dana Doe");
    }

    #[test]
    fn corrupt_user_file_is_fatal_and_untouched() {
        let scratch = Scratch::new();
        let config = scratch.config();
        fs::write(&config.users_file, "{\"admin\": ").unwrap();

        let err = FileDesk::open_files(&config).err().unwrap();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert_eq!(fs::read_to_string(&config.users_file).unwrap(), "{\"admin\": ");
    }

    #[test]
    fn user_file_without_admin_is_rejected() {
        let scratch = Scratch::new();
        let config = scratch.config();
        for text in ["{}", r#"{"bob": {"password": "pw12", "role": "staff"}}"#] {
            fs::write(&config.users_file, text).unwrap();
            let err = FileDesk::open_files(&config).err().unwrap();
            assert!(matches!(err, StoreError::Invalid { .. }));
            assert!(err.to_string().contains("at least one admin"));
            assert_eq!(fs::read_to_string(&config.users_file).unwrap(), text);
        }
    }

    #[test]
    fn hand_written_minimal_inventory_loads() {
        let scratch = Scratch::new();
        let config = scratch.config();
        fs::write(
            &config.inventory_file,
            r#"[{"name": "widget", "quantity": 4, "price": 1.25}]"#,
        )
        .unwrap();

        let desk = FileDesk::open_files(&config).unwrap();
        let widget = desk.inventory().find("widget").unwrap();
        assert_eq!(widget.quantity, 4);
        assert_eq!(widget.reorder_level, stockroom_inventory::DEFAULT_REORDER_LEVEL);
    }
}

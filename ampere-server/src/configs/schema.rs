use crate::models::{BillTable, Table};

pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(tables: Vec<Box<dyn Table>>) -> Self {
        Self { tables }
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![Box::new(BillTable)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockLedgerTable;

    impl Table for MockLedgerTable {
        fn create(&self) -> String {
            "CREATE TABLE ledger;".to_string()
        }

        fn dispose(&self) -> String {
            "DROP TABLE ledger;".to_string()
        }
    }

    #[test]
    fn test_dispose_in_reverse_order() {
        let manager = SchemaManager::new(vec![Box::new(BillTable), Box::new(MockLedgerTable)]);

        let create = manager.create_schema();
        let dispose = manager.dispose_schema();

        assert!(create[0].contains("CREATE TABLE IF NOT EXISTS bills"));
        assert_eq!(create[1], "CREATE TABLE ledger;");
        assert_eq!(dispose[0], "DROP TABLE ledger;");
        assert_eq!(dispose[1], "DROP TABLE IF EXISTS bills;");
    }
}

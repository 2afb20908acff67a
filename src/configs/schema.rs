use crate::models::{DeviceTable, SensorTable, SensorValueTable, Table};

/// Collects the table definitions and emits their DDL so that every
/// table is created after the tables it references, and dropped in the
/// reverse order.
pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(tables: Vec<Box<dyn Table>>) -> Self {
        Self {
            tables: Self::order(tables),
        }
    }

    fn order(mut pending: Vec<Box<dyn Table>>) -> Vec<Box<dyn Table>> {
        let mut ordered: Vec<Box<dyn Table>> = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let ready = pending.iter().position(|table| {
                table
                    .dependencies()
                    .iter()
                    .all(|dep| ordered.iter().any(|placed| placed.name() == *dep))
            });

            match ready {
                Some(index) => ordered.push(pending.remove(index)),
                None => panic!("circular or unresolved table dependencies"),
            }
        }

        ordered
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
        SchemaManager::new(vec![
            Box::new(DeviceTable),
            Box::new(SensorTable),
            Box::new(SensorValueTable),
        ])
    }
}

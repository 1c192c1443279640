use scenarium_core::{
    entity::{FileEntry, RuntimeRequest, Variable},
    value::Value,
};
use std::fmt;

///
/// Column
///
/// One table column: a title plus a scalar projection from the row entity.
/// Models take a `&'static [Column<E>]` table, so adding a column is a data
/// change, not a new model type.
///

pub struct Column<E> {
    pub title: &'static str,
    pub project: fn(&E) -> Value,
}

impl<E> Column<E> {
    /// Projects one cell from `entity`.
    #[must_use]
    pub fn cell(&self, entity: &E) -> Value {
        (self.project)(entity)
    }
}

// the derive macros would bound E itself, so these are spelled out
impl<E> Clone for Column<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Column<E> {}

impl<E> fmt::Debug for Column<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column").field("title", &self.title).finish()
    }
}

// ============================================================================
// COLUMN TABLES
// ============================================================================

/// Variable rows: absent length renders as "arbitrary length", the default
/// payload renders as "-" while the default flag is off.
pub const VARIABLE_COLUMNS: &[Column<Variable>] = &[
    Column {
        title: "Name",
        project: |v| Value::from(v.name.as_str()),
    },
    Column {
        title: "Type",
        project: |v| Value::from(v.type_name.as_str()),
    },
    Column {
        title: "Length",
        project: |v| match v.length {
            Some(length) => Value::Uint(u64::from(length)),
            None => Value::from("arbitrary length"),
        },
    },
    Column {
        title: "Default",
        project: |v| {
            if v.has_default {
                Value::Bytes(v.default_value.clone())
            } else {
                Value::from("-")
            }
        },
    },
    Column {
        title: "Description",
        project: |v| Value::from(v.description.as_str()),
    },
    Column {
        title: "Value",
        project: |v| Value::Bytes(v.value.clone()),
    },
];

/// FileEntry rows.
pub const FILE_COLUMNS: &[Column<FileEntry>] = &[
    Column {
        title: "Name",
        project: |f| Value::from(f.name.as_str()),
    },
    Column {
        title: "Type",
        project: |f| Value::from(f.type_name.as_str()),
    },
    Column {
        title: "Data ready",
        project: |f| Value::Bool(f.data_ready),
    },
    Column {
        title: "Data size",
        project: |f| Value::Uint(f.data.len() as u64),
    },
    Column {
        title: "External store",
        project: |f| Value::Bool(f.use_file_store),
    },
    Column {
        title: "Description",
        project: |f| Value::from(f.description.as_str()),
    },
];

/// RuntimeRequest rows: unset timestamps render as empty cells.
pub const REQUEST_COLUMNS: &[Column<RuntimeRequest>] = &[
    Column {
        title: "Status",
        project: |r| Value::from(r.status.label()),
    },
    Column {
        title: "Requested at",
        project: |r| Value::from(r.requested_at),
    },
    Column {
        title: "Finished at",
        project: |r| Value::from(r.finished_at),
    },
];

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use scenarium_core::types::{Id, Timestamp};

    #[test]
    fn variable_columns_render_the_length_and_default_placeholders() {
        let mut variable = Variable::new(Id::generate(), "speed");
        variable.type_name = "uint32".to_string();
        variable.length = None;
        variable.has_default = false;

        let cells: Vec<String> = VARIABLE_COLUMNS
            .iter()
            .map(|c| c.cell(&variable).to_string())
            .collect();

        assert_eq!(cells[0], "speed");
        assert_eq!(cells[1], "uint32");
        assert_eq!(cells[2], "arbitrary length");
        assert_eq!(cells[3], "-");

        variable.length = Some(8);
        variable.has_default = true;
        variable.default_value = vec![0; 8];

        assert_eq!(VARIABLE_COLUMNS[2].cell(&variable), Value::Uint(8));
        assert_eq!(VARIABLE_COLUMNS[3].cell(&variable).to_string(), "8 bytes");
    }

    #[test]
    fn file_columns_project_flags_and_sizes() {
        let mut file = FileEntry::new(Id::generate(), "rom.bin");
        file.data = vec![1, 2, 3];
        file.data_ready = true;

        assert_eq!(FILE_COLUMNS[2].cell(&file), Value::Bool(true));
        assert_eq!(FILE_COLUMNS[3].cell(&file), Value::Uint(3));
        assert_eq!(FILE_COLUMNS[4].cell(&file), Value::Bool(false));
    }

    #[test]
    fn request_columns_render_unset_timestamps_as_empty() {
        let mut request = RuntimeRequest::new(Id::generate());

        assert_eq!(REQUEST_COLUMNS[0].cell(&request).to_string(), "created");
        assert_eq!(REQUEST_COLUMNS[1].cell(&request), Value::Null);
        assert_eq!(REQUEST_COLUMNS[2].cell(&request).to_string(), "");

        request.requested_at = Some(Timestamp::from_seconds(42));
        assert_eq!(
            REQUEST_COLUMNS[1].cell(&request),
            Value::Timestamp(Timestamp::from_seconds(42))
        );
    }

    #[test]
    fn column_tables_have_stable_titles() {
        let titles: Vec<&str> = VARIABLE_COLUMNS.iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            ["Name", "Type", "Length", "Default", "Description", "Value"]
        );

        assert_eq!(FILE_COLUMNS.len(), 6);
        assert_eq!(REQUEST_COLUMNS.len(), 3);
    }
}

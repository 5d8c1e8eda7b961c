//! Attribute editor row model. Persistence of attribute edits is
//! engine-side; this module only tracks the per-row diff against the file.

/// Edit state of one attribute row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowState {
    Clean,
    Modified,
    Added,
    Deleted,
}

/// One editable attribute row.
#[derive(Clone, Debug)]
pub struct AttributeRow {
    pub name: String,
    pub value: String,
    /// `(name, value)` as loaded from the file; `None` for rows added in
    /// the editor.
    original: Option<(String, String)>,
    deleted: bool,
}

impl AttributeRow {
    pub fn from_file(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        Self {
            original: Some((name.clone(), value.clone())),
            name,
            value,
            deleted: false,
        }
    }

    pub fn added() -> Self {
        Self {
            name: String::new(),
            value: String::new(),
            original: None,
            deleted: false,
        }
    }

    /// Added rows are never `Modified`; deletion masks modification; a file
    /// row is `Modified` iff its name or value differs from the original.
    pub fn state(&self) -> RowState {
        let Some((original_name, original_value)) = &self.original else {
            return RowState::Added;
        };
        if self.deleted {
            return RowState::Deleted;
        }
        if self.name != *original_name || self.value != *original_value {
            RowState::Modified
        } else {
            RowState::Clean
        }
    }

    /// Apply an edit. Editing a deleted row revives it.
    pub fn edit(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.deleted = false;
        self.name = name.into();
        self.value = value.into();
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn toggle_deleted(&mut self) {
        self.deleted = !self.deleted;
    }
}

/// The attribute table for the open document.
#[derive(Clone, Debug, Default)]
pub struct AttributeTable {
    rows: Vec<AttributeRow>,
}

impl AttributeTable {
    /// Replace the table with the entries read from a file.
    pub fn load(entries: Vec<(String, String)>) -> Self {
        Self {
            rows: entries
                .into_iter()
                .map(|(name, value)| AttributeRow::from_file(name, value))
                .collect(),
        }
    }

    /// Append an empty editor-added row; returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(AttributeRow::added());
        self.rows.len() - 1
    }

    /// Delete action on a row: added rows are removed outright, file rows
    /// toggle their deleted mark.
    pub fn delete_row(&mut self, index: usize) {
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        if row.state() == RowState::Added {
            self.rows.remove(index);
        } else {
            row.toggle_deleted();
        }
    }

    pub fn rows(&self) -> &[AttributeRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [AttributeRow] {
        &mut self.rows
    }

    /// True when any row differs from the file.
    pub fn dirty(&self) -> bool {
        self.rows.iter().any(|row| row.state() != RowState::Clean)
    }
}

//! Domain entities: core data structures

use crate::domain::DomainError;

/// Roles offered when adding or editing a member.
pub const ROLES: [&str; 6] = [
    "Ketua",
    "Wakil Ketua",
    "Sekretaris",
    "Bendahara",
    "Koordinator",
    "Anggota",
];

/// Divisions offered when adding or editing a member.
pub const DIVISIONS: [&str; 6] = [
    "Takmir",
    "Dakwah",
    "Pendidikan",
    "Sosial",
    "Remaja",
    "Umum",
];

/// Format used for the join date column.
pub const JOIN_DATE_FORMAT: &str = "%Y-%m-%d";

/// One member of the organization (one row of the roster table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// Unique key, assigned on creation
    pub id: u64,
    pub name: String,
    /// Title/position, e.g. "Ketua"
    pub role: String,
    /// Organizational sub-unit, e.g. "Dakwah"
    pub division: String,
    /// Salary or operational budget in whole Rupiah
    pub amount: u64,
    pub phone: String,
    /// Set once on creation, never changed by edits
    pub join_date: String,
}

impl MemberRecord {
    /// Build a new record from its mutable fields plus the assigned keys.
    pub fn new(id: u64, fields: MemberFields, join_date: impl Into<String>) -> Self {
        Self {
            id,
            name: fields.name,
            role: fields.role,
            division: fields.division,
            amount: fields.amount,
            phone: fields.phone,
            join_date: join_date.into(),
        }
    }

    /// Overwrite every mutable field; `id` and `join_date` stay untouched.
    pub fn apply(&mut self, fields: MemberFields) {
        self.name = fields.name;
        self.role = fields.role;
        self.division = fields.division;
        self.amount = fields.amount;
        self.phone = fields.phone;
    }

    /// The mutable part of this record.
    pub fn fields(&self) -> MemberFields {
        MemberFields {
            name: self.name.clone(),
            role: self.role.clone(),
            division: self.division.clone(),
            amount: self.amount,
            phone: self.phone.clone(),
        }
    }
}

/// Fields a caller supplies when adding or editing a member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberFields {
    pub name: String,
    pub role: String,
    pub division: String,
    pub amount: u64,
    pub phone: String,
}

impl MemberFields {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        division: impl Into<String>,
        amount: u64,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            division: division.into(),
            amount,
            phone: phone.into(),
        }
    }

    /// Check that name, role and division are present.
    ///
    /// Phone is optional. The roster service does not call this; it is the
    /// caller's job to reject incomplete input before mutating the table.
    pub fn validate_required(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("name", &self.name),
            ("role", &self.role),
            ("division", &self.division),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// Next free member ID: one past the largest existing ID, or 1 for an empty table.
pub fn next_member_id(table: &[MemberRecord]) -> Result<u64, DomainError> {
    match table.iter().map(|m| m.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(DomainError::IdSpaceExhausted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> MemberRecord {
        MemberRecord::new(
            id,
            MemberFields::new("Ali", "Ketua", "Takmir", 5_000_000, "0811"),
            "2024-01-01",
        )
    }

    #[test]
    fn given_empty_table_when_next_id_then_one() {
        assert_eq!(next_member_id(&[]).unwrap(), 1);
    }

    #[test]
    fn given_gaps_in_ids_when_next_id_then_max_plus_one() {
        let table = vec![record(3), record(1), record(7)];
        assert_eq!(next_member_id(&table).unwrap(), 8);
    }

    #[test]
    fn given_max_id_when_next_id_then_exhausted() {
        let table = vec![record(u64::MAX)];
        assert!(matches!(
            next_member_id(&table),
            Err(DomainError::IdSpaceExhausted)
        ));
    }

    #[test]
    fn given_blank_name_when_validating_then_missing_field() {
        let fields = MemberFields::new("  ", "Ketua", "Takmir", 0, "");
        match fields.validate_required() {
            Err(DomainError::MissingField(field)) => assert_eq!(field, "name"),
            other => panic!("expected missing name, got {other:?}"),
        }
    }

    #[test]
    fn given_empty_phone_when_validating_then_ok() {
        let fields = MemberFields::new("Ali", "Ketua", "Takmir", 0, "");
        assert!(fields.validate_required().is_ok());
    }

    #[test]
    fn given_record_when_apply_then_keys_preserved() {
        let mut member = record(4);
        member.apply(MemberFields::new("Budi", "Anggota", "Remaja", 1, "0812"));
        assert_eq!(member.id, 4);
        assert_eq!(member.join_date, "2024-01-01");
        assert_eq!(member.name, "Budi");
        assert_eq!(member.fields().division, "Remaja");
    }
}

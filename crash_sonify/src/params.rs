// Parameter fields and the column table the assembler fills in.
//
// A score event for the record instrument has exactly twelve p-fields. Their
// roles are fixed by the orchestra (see orchestra.rs):
//
//   p1  instrument number        p7  release time
//   p2  start time               p8  reverb send gain
//   p3  duration                 p9  stereo balance
//   p4  amplitude                p10 pitch ratio
//   p5  sample skip time         p11 filter cutoff
//   p6  attack time              p12 filter sweep duration
//
// `ParameterTable` stores one column per field. Columns start out absent and
// are filled exactly once by the assembler; the serializer only reads from a
// table whose columns are all present and of the right length, which is what
// `vectors()` checks.

use crate::error::SonifyError;
use serde::Serialize;
use std::fmt;

/// Number of p-fields in a record event.
pub const PARAMETER_COUNT: usize = 12;

/// One p-field slot of a record event, in score order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    P1 = 0,
    P2 = 1,
    P3 = 2,
    P4 = 3,
    P5 = 4,
    P6 = 5,
    P7 = 6,
    P8 = 7,
    P9 = 8,
    P10 = 9,
    P11 = 10,
    P12 = 11,
}

impl Field {
    pub const ALL: [Field; PARAMETER_COUNT] = [
        Field::P1,
        Field::P2,
        Field::P3,
        Field::P4,
        Field::P5,
        Field::P6,
        Field::P7,
        Field::P8,
        Field::P9,
        Field::P10,
        Field::P11,
        Field::P12,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Score-facing name, `p1` through `p12`.
    pub fn name(self) -> &'static str {
        const NAMES: [&str; PARAMETER_COUNT] = [
            "p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9", "p10", "p11", "p12",
        ];
        NAMES[self.index()]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The complete p1..p12 vector of one record event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterVector(pub [f64; PARAMETER_COUNT]);

impl ParameterVector {
    pub fn get(&self, field: Field) -> f64 {
        self.0[field.index()]
    }

    pub fn values(&self) -> &[f64; PARAMETER_COUNT] {
        &self.0
    }
}

/// Column-oriented parameter storage for a whole record table.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    len: usize,
    columns: [Option<Vec<f64>>; PARAMETER_COUNT],
}

impl ParameterTable {
    /// An empty table for `len` records; no columns are present yet.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            columns: Default::default(),
        }
    }

    /// Number of records (rows).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store the column for `field`. A column must have one value per
    /// record and may only be written once.
    pub fn insert(&mut self, field: Field, column: Vec<f64>) -> Result<(), SonifyError> {
        if column.len() != self.len {
            return Err(SonifyError::ColumnLength {
                field,
                expected: self.len,
                actual: column.len(),
            });
        }
        let slot = &mut self.columns[field.index()];
        if slot.is_some() {
            return Err(SonifyError::DuplicateField { field });
        }
        *slot = Some(column);
        Ok(())
    }

    pub fn column(&self, field: Field) -> Option<&[f64]> {
        self.columns[field.index()].as_deref()
    }

    /// Fields that have not been filled in yet, in score order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.columns[f.index()].is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.columns.iter().all(Option::is_some)
    }

    /// Transpose the columns into one vector per record, in record order.
    /// Fails with a structural error if any column is missing.
    pub fn vectors(&self) -> Result<Vec<ParameterVector>, SonifyError> {
        let mut columns: Vec<&[f64]> = Vec::with_capacity(PARAMETER_COUNT);
        for field in Field::ALL {
            let column = self
                .column(field)
                .ok_or(SonifyError::MissingField { field })?;
            if column.len() != self.len {
                return Err(SonifyError::ColumnLength {
                    field,
                    expected: self.len,
                    actual: column.len(),
                });
            }
            columns.push(column);
        }

        Ok((0..self.len)
            .map(|row| ParameterVector(std::array::from_fn(|i| columns[i][row])))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table(len: usize) -> ParameterTable {
        let mut table = ParameterTable::new(len);
        for field in Field::ALL {
            let column = (0..len).map(|row| (field.index() * 100 + row) as f64).collect();
            table.insert(field, column).unwrap();
        }
        table
    }

    #[test]
    fn test_field_order_and_names() {
        assert_eq!(Field::ALL.len(), PARAMETER_COUNT);
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(field.name(), format!("p{}", i + 1));
        }
        assert_eq!(Field::P12.to_string(), "p12");
    }

    #[test]
    fn test_vectors_transpose_columns() {
        let table = full_table(3);
        assert!(table.is_complete());
        let vectors = table.vectors().unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[1].get(Field::P1), 1.0);
        assert_eq!(vectors[2].get(Field::P12), 1102.0);
        assert_eq!(vectors[0].values().len(), PARAMETER_COUNT);
    }

    #[test]
    fn test_missing_field_is_structural_error() {
        let mut table = ParameterTable::new(2);
        for field in Field::ALL.into_iter().filter(|f| *f != Field::P7) {
            table.insert(field, vec![0.0; 2]).unwrap();
        }
        assert_eq!(table.missing_fields(), vec![Field::P7]);
        assert!(matches!(
            table.vectors(),
            Err(SonifyError::MissingField { field: Field::P7 })
        ));
    }

    #[test]
    fn test_insert_rejects_wrong_length() {
        let mut table = ParameterTable::new(2);
        let err = table.insert(Field::P4, vec![0.3; 3]).unwrap_err();
        assert!(matches!(
            err,
            SonifyError::ColumnLength {
                field: Field::P4,
                expected: 2,
                actual: 3
            }
        ));
        assert!(table.column(Field::P4).is_none());
    }

    #[test]
    fn test_insert_rejects_second_write() {
        let mut table = ParameterTable::new(1);
        table.insert(Field::P2, vec![0.0]).unwrap();
        assert!(matches!(
            table.insert(Field::P2, vec![1.0]),
            Err(SonifyError::DuplicateField { field: Field::P2 })
        ));
        assert_eq!(table.column(Field::P2), Some(&[0.0][..]));
    }

    #[test]
    fn test_empty_table_is_complete_once_filled() {
        let table = full_table(0);
        assert!(table.is_empty());
        assert!(table.vectors().unwrap().is_empty());
    }
}

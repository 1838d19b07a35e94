//! Storage of garbled tables, decoupled from the circuit topology.
//!
//! A [`GarbledCircuit`](crate::GarbledCircuit) only owns its tables through a
//! [`GarbledTablesHolder`], so that many instances of the same [`Circuit`](crate::Circuit) can
//! swap tables without touching the (much larger) description.

use serde::{Deserialize, Serialize};

use crate::Error;

/// How the rows of all gate tables are laid out in memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableLayout {
    /// A single buffer with the tables of all non-free gates back to back.
    #[default]
    Contiguous,
    /// One buffer per non-free gate.
    PerGate,
}

impl TableLayout {
    /// Wraps the concatenated tables of all non-free gates into a holder of this layout.
    pub(crate) fn holder(
        &self,
        tables: Vec<u8>,
        table_size: usize,
    ) -> Box<dyn GarbledTablesHolder> {
        match self {
            TableLayout::Contiguous => Box::new(ContiguousTables::new(tables)),
            TableLayout::PerGate => Box::new(PerGateTables::new(
                tables.chunks(table_size).map(<[u8]>::to_vec).collect(),
            )),
        }
    }
}

/// A storage-agnostic view on the garbled tables of one circuit instance.
pub trait GarbledTablesHolder: std::fmt::Debug + Send + Sync {
    /// The layout of this holder.
    fn layout(&self) -> TableLayout;

    /// The tables as one or more contiguous byte regions.
    fn as_buffer_set(&self) -> Vec<&[u8]>;

    /// Size in bytes of the region at `index`; fails with [`Error::InvalidArgument`] for an
    /// index outside of [`GarbledTablesHolder::as_buffer_set`].
    fn size_of(&self, index: usize) -> Result<usize, Error>;

    /// The table of the `table_gate`-th non-free gate, each table being `table_size` bytes.
    fn gate_table(&self, table_gate: usize, table_size: usize) -> Result<&[u8], Error>;

    /// Copies the holder, e.g. to hand the same tables to another instance.
    fn clone_boxed(&self) -> Box<dyn GarbledTablesHolder>;

    /// Number of regions returned by [`GarbledTablesHolder::as_buffer_set`].
    fn num_buffers(&self) -> usize {
        self.as_buffer_set().len()
    }

    /// Total size in bytes over all regions.
    fn total_size(&self) -> usize {
        self.as_buffer_set().iter().map(|b| b.len()).sum()
    }
}

/// All tables in a single buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContiguousTables {
    tables: Vec<u8>,
}

impl ContiguousTables {
    /// Takes ownership of the concatenated gate tables.
    pub fn new(tables: Vec<u8>) -> Self {
        Self { tables }
    }

    /// Gives back the underlying buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.tables
    }
}

impl GarbledTablesHolder for ContiguousTables {
    fn layout(&self) -> TableLayout {
        TableLayout::Contiguous
    }

    fn as_buffer_set(&self) -> Vec<&[u8]> {
        vec![self.tables.as_slice()]
    }

    fn size_of(&self, index: usize) -> Result<usize, Error> {
        if index != 0 {
            return Err(Error::InvalidArgument(
                "contiguous tables consist of a single buffer",
            ));
        }
        Ok(self.tables.len())
    }

    fn gate_table(&self, table_gate: usize, table_size: usize) -> Result<&[u8], Error> {
        let start = table_gate * table_size;
        self.tables
            .get(start..start + table_size)
            .ok_or(Error::InvalidArgument("no garbled table for this gate"))
    }

    fn clone_boxed(&self) -> Box<dyn GarbledTablesHolder> {
        Box::new(self.clone())
    }
}

/// One buffer per non-free gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerGateTables {
    tables: Vec<Vec<u8>>,
}

impl PerGateTables {
    /// Takes ownership of the tables, one buffer per non-free gate in circuit order.
    pub fn new(tables: Vec<Vec<u8>>) -> Self {
        Self { tables }
    }

    /// Gives back the underlying buffers.
    pub fn into_inner(self) -> Vec<Vec<u8>> {
        self.tables
    }
}

impl GarbledTablesHolder for PerGateTables {
    fn layout(&self) -> TableLayout {
        TableLayout::PerGate
    }

    fn as_buffer_set(&self) -> Vec<&[u8]> {
        self.tables.iter().map(Vec::as_slice).collect()
    }

    fn size_of(&self, index: usize) -> Result<usize, Error> {
        self.tables
            .get(index)
            .map(Vec::len)
            .ok_or(Error::InvalidArgument("no buffer at this index"))
    }

    fn gate_table(&self, table_gate: usize, table_size: usize) -> Result<&[u8], Error> {
        match self.tables.get(table_gate) {
            Some(table) if table.len() == table_size => Ok(table),
            _ => Err(Error::InvalidArgument("no garbled table for this gate")),
        }
    }

    fn clone_boxed(&self) -> Box<dyn GarbledTablesHolder> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_tables() {
        let holder = TableLayout::Contiguous.holder((0..64).collect(), 32);
        assert_eq!(holder.num_buffers(), 1);
        assert_eq!(holder.size_of(0), Ok(64));
        assert!(matches!(holder.size_of(1), Err(Error::InvalidArgument(_))));
        assert_eq!(holder.gate_table(1, 32).unwrap()[0], 32);
        assert!(holder.gate_table(2, 32).is_err());
    }

    #[test]
    fn per_gate_tables() {
        let holder = TableLayout::PerGate.holder((0..96).collect(), 32);
        assert_eq!(holder.layout(), TableLayout::PerGate);
        assert_eq!(holder.num_buffers(), 3);
        assert_eq!(holder.size_of(2), Ok(32));
        assert!(matches!(holder.size_of(3), Err(Error::InvalidArgument(_))));
        assert_eq!(holder.gate_table(2, 32).unwrap()[31], 95);
        assert!(holder.gate_table(0, 48).is_err());
        assert_eq!(holder.total_size(), 96);
    }

    #[test]
    fn holders_give_back_their_buffers() {
        let tables: Vec<u8> = (0..64).collect();

        let contiguous = ContiguousTables::new(tables.clone());
        assert_eq!(contiguous.clone_boxed().total_size(), 64);
        assert_eq!(contiguous.into_inner(), tables);

        let per_gate = PerGateTables::new(tables.chunks(32).map(<[u8]>::to_vec).collect());
        assert_eq!(per_gate.gate_table(1, 32).unwrap(), &tables[32..]);
        let buffers = per_gate.into_inner();
        assert_eq!(buffers.len(), 2);
        assert_eq!(buffers.concat(), tables);
    }

    #[test]
    fn layouts_agree() {
        let tables: Vec<u8> = (0..=255).collect();
        let a = TableLayout::Contiguous.holder(tables.clone(), 16);
        let b = TableLayout::PerGate.holder(tables, 16);
        for gate in 0..16 {
            assert_eq!(a.gate_table(gate, 16), b.gate_table(gate, 16));
        }
        assert_eq!(a.as_buffer_set().concat(), b.as_buffer_set().concat());
    }
}

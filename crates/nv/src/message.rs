use crate::table::NvTable;

/// The unit of work flowing through the pipeline: an `NvTable` plus the
/// small bit of metadata every source attaches (the host it arrived from,
/// the reporting program, the message body text, and its receipt
/// timestamp). Cloning a `LogMessage` is cheap — the table clone is a
/// reference bump, same as `NvTable::new_ref` — which is what makes cheap
/// fanout across parallel pipeline branches possible.
#[derive(Debug, Clone)]
pub struct LogMessage {
    table: NvTable,
    host: Box<str>,
    program: Box<str>,
    /// The free-form message text (`$MSG`), distinct from `program` (`$PROGRAM`).
    message: Box<str>,
    /// Unix timestamp (seconds, UTC) the message was received at.
    timestamp: i64,
}

impl LogMessage {
    pub fn new(
        table: NvTable,
        host: impl Into<Box<str>>,
        program: impl Into<Box<str>>,
        message: impl Into<Box<str>>,
        timestamp: i64,
    ) -> Self {
        LogMessage { table, host: host.into(), program: program.into(), message: message.into(), timestamp }
    }

    pub fn table(&self) -> &NvTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut NvTable {
        &mut self.table
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn ref_count(&self) -> usize {
        self.table.ref_count()
    }

    /// Bumps the table's reference count and returns an independent handle
    /// to the same message, mirroring `NvTable::new_ref`.
    pub fn new_ref(&self) -> LogMessage {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ref_shares_the_underlying_table() {
        let table = NvTable::new(4, 4, 64);
        let msg = LogMessage::new(table, "host-a", "prog", "hello world", 1_700_000_000);
        let msg2 = msg.new_ref();
        assert_eq!(msg.table().ref_count(), 2);
        assert_eq!(msg2.host(), "host-a");
    }
}

//! Fixtures for packet-log text generation.
//!
//! Builders produce the on-disk text of the three file kinds so tests can
//! describe runs declaratively instead of embedding raw log text.

/// Builder for one `>>...` packet of a primary log.
///
/// # Example
/// ```
/// use qoelog_testing::PacketBuilder;
///
/// let text = PacketBuilder::new("Test", "01-Jan-2022 10:00:00")
///     .field("MOS", "4.5")
///     .build();
/// assert!(text.starts_with(">>Test started at"));
/// ```
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    operation: String,
    date: String,
    fields: Vec<(String, String)>,
    pre_notes: Option<Vec<String>>,
    post_notes: Option<Vec<String>>,
    error_notes: Option<Vec<String>>,
    complete: bool,
}

impl PacketBuilder {
    pub fn new(operation: &str, date: &str) -> Self {
        Self {
            operation: operation.to_string(),
            date: date.to_string(),
            fields: Vec::new(),
            pre_notes: None,
            post_notes: None,
            error_notes: None,
            complete: true,
        }
    }

    /// Add a tab-indented `name:value` preamble line.
    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    /// Record the commit the run was made with.
    pub fn git_hash(self, hash: &str) -> Self {
        self.field("Git Hash", hash)
    }

    pub fn arguments(self, arguments: &str) -> Self {
        self.field("Arguments", arguments)
    }

    pub fn pre_note(mut self, line: &str) -> Self {
        self.pre_notes.get_or_insert_with(Vec::new).push(line.to_string());
        self
    }

    pub fn post_note(mut self, line: &str) -> Self {
        self.post_notes.get_or_insert_with(Vec::new).push(line.to_string());
        self
    }

    /// Add a test-error note; the packet will be flagged as an error.
    pub fn error_note(mut self, line: &str) -> Self {
        self.error_notes.get_or_insert_with(Vec::new).push(line.to_string());
        self
    }

    /// Leave out the `===End` marker, as a crashed run would.
    pub fn incomplete(mut self) -> Self {
        self.complete = false;
        self
    }

    pub fn build(&self) -> String {
        let mut out = format!(">>{} started at {}\n", self.operation, self.date);
        for (name, value) in &self.fields {
            out.push_str(&format!("\t{}:{}\n", name, value));
        }

        // error notes are only reachable from the pre-test section
        let pre = match (&self.pre_notes, &self.error_notes) {
            (Some(pre), _) => Some(pre.as_slice()),
            (None, Some(_)) => Some(&[][..]),
            (None, None) => None,
        };
        if let Some(lines) = pre {
            push_section(&mut out, "===Pre-Test Notes===", lines);
        }
        if let Some(lines) = &self.error_notes {
            push_section(&mut out, "===Test-Error Notes===", lines);
        } else if let Some(lines) = &self.post_notes {
            push_section(&mut out, "===Post-Test Notes===", lines);
        }

        if self.complete {
            out.push_str(&format!("===End {}===\n", self.operation));
        }
        out
    }
}

fn push_section(out: &mut String, marker: &str, lines: &[String]) {
    out.push_str(marker);
    out.push('\n');
    for line in lines {
        out.push('\t');
        out.push_str(line);
        out.push('\n');
    }
}

/// Concatenate packets into one log file's text.
pub fn log_text(packets: &[PacketBuilder]) -> String {
    packets.iter().map(PacketBuilder::build).collect()
}

/// Builder for one addendum packet.
#[derive(Debug, Clone)]
pub struct AddendumBuilder {
    operation: String,
    date: String,
    fields: Vec<(String, String)>,
}

impl AddendumBuilder {
    pub fn new(operation: &str, date: &str) -> Self {
        Self {
            operation: operation.to_string(),
            date: date.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn set(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn build(&self) -> String {
        let mut out = format!(">>{} at {}\n", self.operation, self.date);
        for (name, value) in &self.fields {
            out.push_str(&format!("\t{}:{}\n", name, value));
        }
        out.push_str("<<\n");
        out
    }
}

/// One `groups:dates` line of a group file.
pub fn group_line(groups: &[&str], dates: &[&str]) -> String {
    format!("{}:{}\n", groups.join(","), dates.join(","))
}

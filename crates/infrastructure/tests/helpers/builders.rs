/// Raw wire-format query builder, independent of the codec under test.
pub struct QueryBuilder {
    id: u16,
    flags: u16,
    questions: Vec<(String, u16)>,
    trailing: Vec<u8>,
}

impl QueryBuilder {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            flags: 0x0100,
            questions: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn a(id: u16, domain: &str) -> Vec<u8> {
        Self::new(id).question(domain, 1).build()
    }

    pub fn question(mut self, domain: &str, qtype: u16) -> Self {
        self.questions.push((domain.to_string(), qtype));
        self
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    /// Bytes appended after the question section without touching any count.
    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    /// Declares one additional record but supplies `bytes` as its content.
    pub fn broken_additional(self, bytes: &[u8]) -> Vec<u8> {
        let mut wire = self.build();
        wire[11] = 1;
        wire.extend_from_slice(bytes);
        wire
    }

    pub fn build(self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(64);
        wire.extend_from_slice(&self.id.to_be_bytes());
        wire.extend_from_slice(&self.flags.to_be_bytes());
        wire.extend_from_slice(&(self.questions.len() as u16).to_be_bytes());
        wire.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        for (domain, qtype) in &self.questions {
            for label in domain.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
                wire.push(label.len() as u8);
                wire.extend_from_slice(label.as_bytes());
            }
            wire.push(0);
            wire.extend_from_slice(&qtype.to_be_bytes());
            wire.extend_from_slice(&[0x00, 0x01]);
        }

        wire.extend_from_slice(&self.trailing);
        wire
    }
}

pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut framed = (payload.len() as u16).to_be_bytes().to_vec();
    framed.extend_from_slice(payload);
    framed
}

/// A correctly framed 16-byte payload that is not a DNS message.
pub fn junk_frame() -> Vec<u8> {
    frame(b"this is not dns!")
}

use bytes::{BufMut, BytesMut};


/// The ways of turning a sequence of strings into one string that the suite compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Builds a fresh string from the accumulator and the next part on every step.
    NaiveConcat,
    /// Appends raw bytes to a growable `Vec<u8>` and converts once at the end.
    ByteBuffer,
    /// Library join with an empty separator; one allocation sized up front.
    Join,
    /// Writes each part through the `BufMut` interface of a `BytesMut`.
    Writer,
}

impl Strategy {
    pub const ALL: [Strategy; 4] =
        [Strategy::NaiveConcat, Strategy::ByteBuffer, Strategy::Join, Strategy::Writer];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::NaiveConcat => "NaiveConcat",
            Strategy::ByteBuffer => "ByteBuffer",
            Strategy::Join => "Join",
            Strategy::Writer => "Writer",
        }
    }

    pub fn concat(self, parts: &[String]) -> String {
        match self {
            Strategy::NaiveConcat => naive_concat(parts),
            Strategy::ByteBuffer => byte_buffer(parts),
            Strategy::Join => join(parts),
            Strategy::Writer => writer(parts),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn naive_concat(parts: &[String]) -> String {
    let mut acc = String::new();
    for part in parts {
        // `acc + part` would reuse acc's buffer; the baseline copies every step.
        acc = [acc.as_str(), part.as_str()].concat();
    }
    acc
}

pub fn byte_buffer(parts: &[String]) -> String {
    let mut buf = Vec::new();
    for part in parts {
        buf.extend_from_slice(part.as_bytes());
    }
    into_string(buf)
}

pub fn join(parts: &[String]) -> String {
    parts.join("")
}

pub fn writer(parts: &[String]) -> String {
    let mut buf = BytesMut::new();
    for part in parts {
        buf.put_slice(part.as_bytes());
    }
    into_string(buf.into())
}

fn into_string(bytes: Vec<u8>) -> String {
    // Every byte was copied from a &str, in order.
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

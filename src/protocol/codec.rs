//! Length-prefixed binary encoding shared by every proof type.
//!
//! Field layout: `[len (4 bytes, big-endian)][bytes]`. Decoding is strict:
//! zero or oversized lengths, truncation and trailing bytes all fail with
//! [`Error::MalformedProof`].

use crate::{Error, Group, Result};

/// Upper bound on an encoded group element.
const MAX_ELEMENT_SIZE: usize = 4096;

/// Upper bound on an encoded scalar.
const MAX_SCALAR_SIZE: usize = 512;

/// Upper bound on any encoded sequence length.
pub(crate) const MAX_SEQUENCE_LEN: usize = 1 << 16;

#[derive(Default)]
pub(crate) struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub(crate) fn put_len(&mut self, len: usize) {
        self.buf.extend_from_slice(&(len as u32).to_be_bytes());
    }

    fn put_field(&mut self, bytes: &[u8]) {
        self.put_len(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn put_element<G: Group>(&mut self, element: &G::Element) {
        self.put_field(&G::element_to_bytes(element));
    }

    pub(crate) fn put_scalar<G: Group>(&mut self, scalar: &G::Scalar) {
        self.put_field(&G::scalar_to_bytes(scalar));
    }

    pub(crate) fn put_scalars<G: Group>(&mut self, scalars: &[G::Scalar]) {
        self.put_len(scalars.len());
        for s in scalars {
            self.put_scalar::<G>(s);
        }
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if self.bytes.len() - self.pos < len {
            return Err(Error::MalformedProof(format!(
                "Truncated proof: incomplete {what}"
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn take_u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    pub(crate) fn take_len(&mut self, what: &str, max: usize) -> Result<usize> {
        let raw = self.take(4, what)?;
        let len = u32::from_be_bytes(
            raw.try_into()
                .unwrap_or_else(|_| unreachable!("Slice is exactly 4 bytes")),
        ) as usize;
        if len > max {
            return Err(Error::MalformedProof(format!("Invalid {what} length: {len}")));
        }
        Ok(len)
    }

    fn take_field(&mut self, what: &str, max: usize) -> Result<&'a [u8]> {
        let len = self.take_len(what, max)?;
        if len == 0 {
            return Err(Error::MalformedProof(format!("Empty {what}")));
        }
        self.take(len, what)
    }

    pub(crate) fn take_element<G: Group>(&mut self, what: &str) -> Result<G::Element> {
        let raw = self.take_field(what, MAX_ELEMENT_SIZE)?;
        let element = G::element_from_bytes(raw)
            .map_err(|e| Error::MalformedProof(format!("{what}: {e}")))?;
        G::validate_element(&element)
            .map_err(|e| Error::MalformedProof(format!("{what}: {e}")))?;
        Ok(element)
    }

    /// Like [`Reader::take_element`], also rejecting the identity.
    pub(crate) fn take_nonidentity<G: Group>(&mut self, what: &str) -> Result<G::Element> {
        let element = self.take_element::<G>(what)?;
        if G::is_identity(&element) {
            return Err(Error::MalformedProof(format!("{what} is the identity element")));
        }
        Ok(element)
    }

    pub(crate) fn take_scalar<G: Group>(&mut self, what: &str) -> Result<G::Scalar> {
        let raw = self.take_field(what, MAX_SCALAR_SIZE)?;
        G::scalar_from_bytes(raw).map_err(|e| Error::MalformedProof(format!("{what}: {e}")))
    }

    pub(crate) fn take_scalars<G: Group>(&mut self, what: &str) -> Result<Vec<G::Scalar>> {
        let len = self.take_len(what, MAX_SEQUENCE_LEN)?;
        (0..len).map(|_| self.take_scalar::<G>(what)).collect()
    }

    pub(crate) fn finish(self) -> Result<()> {
        if self.pos != self.bytes.len() {
            return Err(Error::MalformedProof(format!(
                "Proof has {} trailing bytes",
                self.bytes.len() - self.pos
            )));
        }
        Ok(())
    }
}

/// Checks the leading version byte.
pub(crate) fn expect_version(reader: &mut Reader<'_>, expected: u8) -> Result<()> {
    let version = reader.take_u8("version")?;
    if version != expected {
        return Err(Error::MalformedProof(format!(
            "Unsupported proof version: {version}"
        )));
    }
    Ok(())
}

//! The saved state blob.
//!
//! Little-endian, 11 bytes:
//!
//! | offset | size | field                   |
//! |--------|------|-------------------------|
//! | 0      | 4    | magic `RMSC`            |
//! | 4      | 2    | version, currently 1    |
//! | 6      | 4    | mix, `f32`              |
//! | 10     | 1    | flags, bit 0 is enabled |
use crate::params::Snapshot;

pub const MAGIC: [u8; 4] = *b"RMSC";
pub const VERSION: u16 = 1;
pub const LEN: usize = 11;

const ENABLED: u8 = 1 << 0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("state is truncated ({len} bytes)")]
    Truncated { len: usize },

    #[error("state does not start with the expected magic")]
    BadMagic,

    #[error("unsupported state version {0}")]
    UnsupportedVersion(u16),
}

pub fn encode(state: &Snapshot) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(LEN);
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&state.mix.to_le_bytes());
    bytes.push(if state.enabled { ENABLED } else { 0 });
    bytes
}

/// Decode a blob. The returned mix is clamped to range; a NaN mix restores the default.
pub fn decode(bytes: &[u8]) -> Result<Snapshot, Error> {
    let Some((header, rest)) = bytes.split_first_chunk::<6>() else {
        return Err(Error::Truncated { len: bytes.len() });
    };
    if header[..4] != MAGIC {
        return Err(Error::BadMagic);
    }
    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != VERSION {
        return Err(Error::UnsupportedVersion(version));
    }
    let Some((mix, [flags, ..])) = rest.split_first_chunk::<4>() else {
        return Err(Error::Truncated { len: bytes.len() });
    };

    let mix = f32::from_le_bytes(*mix);
    let mix = if mix.is_nan() { 1.0 } else { mix.clamp(0.0, 1.0) };
    Ok(Snapshot {
        mix,
        enabled: flags & ENABLED != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::{Error, LEN, decode, encode};
    use crate::params::Snapshot;

    #[test]
    fn layout() {
        let bytes = encode(&Snapshot {
            mix: 0.5,
            enabled: false,
        });
        assert_eq!(bytes.len(), LEN);
        assert_eq!(&bytes[..6], b"RMSC\x01\x00");
        assert_eq!(&bytes[6..10], &0.5f32.to_le_bytes());
        assert_eq!(bytes[10], 0);

        let state = Snapshot {
            mix: 0.25,
            enabled: true,
        };
        assert_eq!(decode(&encode(&state)), Ok(state));
    }

    #[test]
    fn rejects_bad_blobs() {
        assert_eq!(decode(&[]), Err(Error::Truncated { len: 0 }));
        assert_eq!(decode(b"RMSC\x01\x00\x00"), Err(Error::Truncated { len: 7 }));
        assert_eq!(decode(b"XXXX\x01\x00\0\0\0\0\x01"), Err(Error::BadMagic));
        assert_eq!(
            decode(b"RMSC\x02\x00\0\0\0\0\x01"),
            Err(Error::UnsupportedVersion(2))
        );
    }

    #[test]
    fn clamps_on_load() {
        let mut bytes = encode(&Snapshot {
            mix: 0.0,
            enabled: true,
        });
        bytes[6..10].copy_from_slice(&7.5f32.to_le_bytes());
        assert_eq!(decode(&bytes).map(|state| state.mix), Ok(1.0));

        bytes[6..10].copy_from_slice(&f32::NAN.to_le_bytes());
        assert_eq!(decode(&bytes).map(|state| state.mix), Ok(1.0));

        bytes[6..10].copy_from_slice(&(-3.0f32).to_le_bytes());
        assert_eq!(decode(&bytes).map(|state| state.mix), Ok(0.0));

        // Unknown flag bits are ignored.
        bytes[10] = 0xfe;
        assert_eq!(decode(&bytes).map(|state| state.enabled), Ok(false));
    }
}

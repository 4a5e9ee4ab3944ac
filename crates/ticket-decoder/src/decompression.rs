// Integrity-checked gzip inflation.
//
// The envelope already extracted the trailer's ISIZE as the declared
// length. Inflation asks the stream for exactly that many bytes. Only a
// member whose gzip header never parses fails to decompress; once the
// header is read, the outcome is judged by how many bytes came out, so a
// stream that ends early (or whose trailer fails verification on the way)
// surfaces as a length mismatch however much it produced first.

use std::io::{self, Read};

use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::DecodeError;

/// First two bytes of every gzip member.
pub(crate) const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Inflate `member`, requiring exactly `declared` bytes of output.
///
/// Never requests more than `declared` bytes from the stream. A declared
/// length above `limit` is rejected before anything is allocated.
pub(crate) fn inflate_exact(
    member: &[u8],
    declared: u32,
    limit: usize,
) -> Result<Vec<u8>, DecodeError> {
    if !member.starts_with(&GZIP_MAGIC) {
        return Err(DecodeError::DecompressionFailed(io::Error::new(
            io::ErrorKind::InvalidData,
            "compressed payload does not start with the gzip magic",
        )));
    }

    let declared_len = usize::try_from(declared).unwrap_or(usize::MAX);
    if declared_len > limit {
        return Err(DecodeError::DecompressionBomb {
            declared: declared_len,
            limit,
        });
    }

    let mut out = Vec::with_capacity(declared_len);
    let mut gz = GzDecoder::new(member);
    let read = (&mut gz).take(u64::from(declared)).read_to_end(&mut out);
    if gz.header().is_none() {
        let err = read.err().unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "gzip header did not parse")
        });
        return Err(DecodeError::DecompressionFailed(err));
    }
    if let Err(err) = read {
        debug!(produced = out.len(), %err, "gzip stream failed after its header");
    }

    if out.len() != declared_len {
        return Err(DecodeError::LengthMismatch {
            declared: declared_len,
            produced: out.len(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    const LIMIT: usize = 1 << 20;

    #[test]
    fn inflates_exactly_declared_length() {
        let data = b"ticket payload bytes".repeat(8);
        let member = gzip(&data);
        let out = inflate_exact(&member, u32::try_from(data.len()).unwrap(), LIMIT).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn overstated_length_is_a_mismatch() {
        let data = b"short record".to_vec();
        let member = gzip(&data);
        let declared = u32::try_from(data.len()).unwrap() + 1;
        let err = inflate_exact(&member, declared, LIMIT).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LengthMismatch { declared: d, produced: p }
                if d == data.len() + 1 && p == data.len()
        ));
    }

    #[test]
    fn understated_length_stops_early() {
        let data = b"0123456789".to_vec();
        let member = gzip(&data);
        let out = inflate_exact(&member, 4, LIMIT).unwrap();
        assert_eq!(out, b"0123");
    }

    #[test]
    fn wrong_magic_fails() {
        let mut member = gzip(b"abc");
        member[0] = 0x00;
        let err = inflate_exact(&member, 3, LIMIT).unwrap_err();
        assert!(matches!(err, DecodeError::DecompressionFailed(_)));
    }

    #[test]
    fn truncated_gzip_header_fails() {
        let member = [0x1F, 0x8B, 0x08, 0x00, 0x00];
        for declared in [0, 4] {
            let err = inflate_exact(&member, declared, LIMIT).unwrap_err();
            assert!(
                matches!(err, DecodeError::DecompressionFailed(_)),
                "declared {declared}: got {err:?}"
            );
        }
    }

    #[test]
    fn corrupt_deflate_body_is_a_mismatch() {
        // Valid gzip header, then a deflate block with the reserved type.
        let mut member = vec![0x1F, 0x8B, 0x08, 0, 0, 0, 0, 0, 0, 0xFF];
        member.extend_from_slice(&[0xFF; 8]);
        member.extend_from_slice(&[0, 0, 0, 0, 4, 0, 0, 0]);
        let err = inflate_exact(&member, 4, LIMIT).unwrap_err();
        assert!(
            matches!(err, DecodeError::LengthMismatch { declared: 4, produced: 0 }),
            "got {err:?}"
        );
    }

    #[test]
    fn empty_stream_with_overstated_length_is_a_mismatch() {
        let mut member = gzip(b"");
        let at = member.len() - 4;
        member[at..].copy_from_slice(&1u32.to_le_bytes());
        let err = inflate_exact(&member, 1, LIMIT).unwrap_err();
        assert!(
            matches!(err, DecodeError::LengthMismatch { declared: 1, produced: 0 }),
            "got {err:?}"
        );
    }

    #[test]
    fn declared_length_over_limit_is_rejected() {
        let member = gzip(b"tiny");
        let err = inflate_exact(&member, 2048, 1024).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::DecompressionBomb {
                declared: 2048,
                limit: 1024
            }
        ));
    }
}

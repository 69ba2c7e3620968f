//! SipHash-2-4 (Aumasson & Bernstein): 2 compression rounds per 8-byte
//! block, 4 finalization rounds, keyed by two 64-bit words.

const C_ROUNDS: u32 = 2;
const D_ROUNDS: u32 = 4;

#[inline(always)]
fn sipround(v0: &mut u64, v1: &mut u64, v2: &mut u64, v3: &mut u64) {
    *v0 = v0.wrapping_add(*v1);
    *v1 = v1.rotate_left(13);
    *v1 ^= *v0;
    *v0 = v0.rotate_left(32);

    *v2 = v2.wrapping_add(*v3);
    *v3 = v3.rotate_left(16);
    *v3 ^= *v2;

    *v0 = v0.wrapping_add(*v3);
    *v3 = v3.rotate_left(21);
    *v3 ^= *v0;

    *v2 = v2.wrapping_add(*v1);
    *v1 = v1.rotate_left(17);
    *v1 ^= *v2;
    *v2 = v2.rotate_left(32);
}

/// Computes the SipHash-2-4 digest of `data` under the 128-bit key `(k0, k1)`.
///
/// Deterministic and pure: equal inputs under equal keys always produce the
/// same `u64`. Callers may take the result modulo any positive capacity.
pub fn siphash24(data: &[u8], k0: u64, k1: u64) -> u64 {
    let mut v0: u64 = 0x736f6d6570736575 ^ k0;
    let mut v1: u64 = 0x646f72616e646f6d ^ k1;
    let mut v2: u64 = 0x6c7967656e657261 ^ k0;
    let mut v3: u64 = 0x7465646279746573 ^ k1;

    let len = data.len();
    let chunks = data.chunks_exact(8);
    let tail = chunks.remainder();

    for chunk in chunks {
        let m = u64::from_le_bytes(chunk.try_into().unwrap());
        v3 ^= m;
        for _ in 0..C_ROUNDS {
            sipround(&mut v0, &mut v1, &mut v2, &mut v3);
        }
        v0 ^= m;
    }

    // final block: remaining bytes, zero-padded, with (len mod 256) in the
    // high byte.
    let mut last = [0u8; 8];
    last[..tail.len()].copy_from_slice(tail);
    last[7] = (len & 0xff) as u8;
    let m = u64::from_le_bytes(last);
    v3 ^= m;
    for _ in 0..C_ROUNDS {
        sipround(&mut v0, &mut v1, &mut v2, &mut v3);
    }
    v0 ^= m;

    v2 ^= 0xff;
    for _ in 0..D_ROUNDS {
        sipround(&mut v0, &mut v1, &mut v2, &mut v3);
    }

    v0 ^ v1 ^ v2 ^ v3
}

/// Hash seam used by blocks to digest their payload.
pub trait HashFunc {
    fn hash(&self, message: &[u8]) -> [u8; 32];
}

/// From-scratch 256-bit digest over 32-bit words and 64-byte blocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256;

impl HashFunc for Sha256 {
    fn hash(&self, message: &[u8]) -> [u8; 32] {
        digest(message)
    }
}

const H_INIT: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

const CHUNK_LEN: usize = 64;
const LENGTH_OFFSET: usize = 56;

pub fn digest(message: &[u8]) -> [u8; 32] {
    let mut state = H_INIT;

    for chunk in pad(message).chunks_exact(CHUNK_LEN) {
        compress(&mut state, chunk);
    }

    let mut out = [0u8; 32];
    for (word, bytes) in state.iter().zip(out.chunks_exact_mut(4)) {
        bytes.copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Digest rendered as 64 lowercase hex characters.
pub fn digest_hex(message: &[u8]) -> String {
    hex::encode(digest(message))
}

fn pad(message: &[u8]) -> Vec<u8> {
    let bit_len = (message.len() as u64).wrapping_mul(8);

    let mut padded = Vec::with_capacity(message.len() + CHUNK_LEN + 8);
    padded.extend_from_slice(message);
    padded.push(0x80);

    while padded.len() % CHUNK_LEN != LENGTH_OFFSET {
        padded.push(0);
    }

    padded.extend_from_slice(&bit_len.to_be_bytes());
    padded
}

fn compress(state: &mut [u32; 8], chunk: &[u8]) {
    let mut w = [0u32; 64];

    for (i, word) in chunk.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }

    for i in 16..64 {
        let s0 = w[i - 15].rotate_right(7) ^ w[i - 15].rotate_right(18) ^ (w[i - 15] >> 3);
        let s1 = w[i - 2].rotate_right(17) ^ w[i - 2].rotate_right(19) ^ (w[i - 2] >> 10);
        w[i] = w[i - 16]
            .wrapping_add(s0)
            .wrapping_add(w[i - 7])
            .wrapping_add(s1);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for i in 0..64 {
        let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
        let ch = (e & f) ^ (!e & g);
        let temp1 = h
            .wrapping_add(s1)
            .wrapping_add(ch)
            .wrapping_add(K[i])
            .wrapping_add(w[i]);

        let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
        let maj = (a & b) ^ (a & c) ^ (b & c);
        let temp2 = s0.wrapping_add(maj);

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(temp1);
        d = c;
        c = b;
        b = a;
        a = temp1.wrapping_add(temp2);
    }

    for (word, value) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *word = word.wrapping_add(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use sha2::Digest as _;

    fn reference(message: &[u8]) -> String {
        hex::encode(sha2::Sha256::digest(message))
    }

    #[test]
    fn test_empty_message_vector() {
        assert_eq!(
            digest_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_published_vectors() {
        assert_eq!(
            digest_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            digest_hex(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"),
            "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1"
        );
        assert_eq!(
            digest_hex(b"The quick brown fox jumps over the lazy dog"),
            "d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592"
        );
    }

    #[test]
    fn test_million_a() {
        let message = vec![b'a'; 1_000_000];
        assert_eq!(
            digest_hex(&message),
            "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0"
        );
    }

    #[test]
    fn test_padding_boundaries() {
        for len in [55, 56, 57, 63, 64, 65, 119, 120, 128] {
            let message = vec![0x5a; len];
            assert_eq!(digest_hex(&message), reference(&message), "length {}", len);
        }
    }

    #[test]
    fn test_padded_length_is_chunk_multiple() {
        for len in 0..200 {
            let padded = pad(&vec![1u8; len]);
            assert_eq!(padded.len() % CHUNK_LEN, 0);
            assert_eq!(padded[len], 0x80);
            let bits = u64::from_be_bytes(padded[padded.len() - 8..].try_into().unwrap());
            assert_eq!(bits, (len as u64) * 8);
        }
    }

    #[test]
    fn test_random_messages_match_reference() {
        let mut rng = rand::rng();

        for _ in 0..256 {
            let len = rng.random_range(0..512);
            let mut message = vec![0u8; len];
            rng.fill(&mut message[..]);

            assert_eq!(digest_hex(&message), reference(&message));
        }
    }

    #[test]
    fn test_hex_shape_and_determinism() {
        let first = digest_hex(b"alice:bob:10:1");
        let second = digest_hex(b"alice:bob:10:1");

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_trait_matches_free_function() {
        assert_eq!(Sha256.hash(b"abc"), digest(b"abc"));
    }
}

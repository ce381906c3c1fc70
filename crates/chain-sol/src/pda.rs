//! Program Derived Address (PDA) search.
//!
//! A PDA is `SHA-256(seed_0 || ... || seed_n || bump || program_id ||
//! "ProgramDerivedAddress")`, accepted only when the digest does NOT decode
//! to a point on the Ed25519 curve. The canonical bump is the first one that
//! succeeds walking down from 255.

use sha2::{Digest, Sha256};

use crate::address::Pubkey;
use crate::error::SolError;

/// Domain separator appended to every PDA hash.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum length of a single seed, in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, including the bump.
pub const MAX_SEEDS: usize = 16;

/// Find the canonical PDA and its bump for `seeds` under `program_id`.
///
/// Fails with [`SolError::InvalidSeeds`] if the seeds can never produce an
/// address, and with [`SolError::PdaNotFound`] if every bump lands on the
/// curve.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    // One slot is reserved for the bump.
    if seeds.len() >= MAX_SEEDS {
        return Err(SolError::InvalidSeeds(format!(
            "{} seeds exceeds the maximum of {}",
            seeds.len(),
            MAX_SEEDS - 1
        )));
    }
    check_seed_lengths(seeds)?;

    for bump in (0u8..=255).rev() {
        if let Some(address) = hash_program_address(seeds, &[bump], program_id) {
            return Ok((address, bump));
        }
    }

    Err(SolError::PdaNotFound)
}

/// Recreate a PDA from seeds that already include the bump.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<Pubkey, SolError> {
    if seeds.len() > MAX_SEEDS {
        return Err(SolError::InvalidSeeds(format!(
            "{} seeds exceeds the maximum of {}",
            seeds.len(),
            MAX_SEEDS
        )));
    }
    check_seed_lengths(seeds)?;

    hash_program_address(seeds, &[], program_id).ok_or(SolError::PdaNotFound)
}

/// Check if 32 bytes decompress to a valid Ed25519 point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

fn check_seed_lengths(seeds: &[&[u8]]) -> Result<(), SolError> {
    for (i, seed) in seeds.iter().enumerate() {
        if seed.len() > MAX_SEED_LEN {
            return Err(SolError::InvalidSeeds(format!(
                "seed {i} is {} bytes, maximum is {MAX_SEED_LEN}",
                seed.len()
            )));
        }
    }
    Ok(())
}

fn hash_program_address(
    seeds: &[&[u8]],
    bump_seed: &[u8],
    program_id: &Pubkey,
) -> Option<Pubkey> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(bump_seed);
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();
    if is_on_curve(&hash) {
        return None;
    }

    Some(Pubkey::new_from_array(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: Pubkey = Pubkey::new_from_array([0x5Au8; 32]);

    #[test]
    fn pda_is_not_on_curve() {
        let (address, _) = find_program_address(&[b"vault", &[1u8; 32]], &PROGRAM).unwrap();
        assert!(!is_on_curve(address.as_array()));
    }

    #[test]
    fn pda_is_deterministic() {
        let a = find_program_address(&[b"seed"], &PROGRAM).unwrap();
        let b = find_program_address(&[b"seed"], &PROGRAM).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seed_order_matters() {
        let (ab, _) = find_program_address(&[b"a", b"b"], &PROGRAM).unwrap();
        let (ba, _) = find_program_address(&[b"b", b"a"], &PROGRAM).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn create_with_bump_matches_find() {
        let (address, bump) = find_program_address(&[b"escrow", b"abc"], &PROGRAM).unwrap();
        let recreated = create_program_address(&[b"escrow", b"abc", &[bump]], &PROGRAM).unwrap();
        assert_eq!(recreated, address);
    }

    #[test]
    fn oversized_seed_is_rejected() {
        let long = [0u8; 33];
        let err = find_program_address(&[&long], &PROGRAM).unwrap_err();
        assert!(matches!(err, SolError::InvalidSeeds(_)));
    }

    #[test]
    fn too_many_seeds_is_rejected() {
        let seeds: Vec<&[u8]> = (0..MAX_SEEDS).map(|_| b"x".as_slice()).collect();
        let err = find_program_address(&seeds, &PROGRAM).unwrap_err();
        assert!(matches!(err, SolError::InvalidSeeds(_)));
    }

    #[test]
    fn basepoint_is_on_curve() {
        let basepoint: [u8; 32] = [
            0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66,
        ];
        assert!(is_on_curve(&basepoint));
    }

    #[test]
    fn matches_published_vector() {
        // findProgramAddressSync([Buffer.from("helloWorld")], SystemProgram.programId)
        let system_program = Pubkey::default();
        let (address, bump) = find_program_address(&[b"helloWorld"], &system_program).unwrap();
        assert_eq!(address.to_string(), "46GZzzetjCURsdFPb7rcnspbEMnCBXe9kpjrsZAkKb6X");
        assert_eq!(bump, 254);

        // Bump 255 lands on the curve, which is why the search moved on.
        assert!(create_program_address(&[b"helloWorld", &[255]], &system_program).is_err());
    }

    #[test]
    fn known_associated_token_account() {
        let ata_program: Pubkey = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL".parse().unwrap();
        let token_program: Pubkey = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".parse().unwrap();
        let mint: Pubkey = "So11111111111111111111111111111111111111112".parse().unwrap();
        let wallet = Pubkey::default();

        let (address, bump) = find_program_address(
            &[wallet.as_ref(), token_program.as_ref(), mint.as_ref()],
            &ata_program,
        )
        .unwrap();
        assert_eq!(address.to_string(), "aqxoAhCwpy3oB1BpNw9hL1HdLYLgPpbPjzxDrrQj3Fs");
        assert_eq!(bump, 254);
    }
}

// External imports
use solana_program::pubkey::Pubkey;

// Internal imports
use audit_common::prelude::*;

/// Seed labels tried during derivation recovery, in priority order.
/// These are the conventional human-readable seeds seen across deployed
/// programs; the search is a heuristic, not a proof of anything.
pub const SEED_CATALOGUE: &[&str] = &[
    "vault",
    "pool",
    "authority",
    "state",
    "config",
    "treasury",
    "escrow",
    "mint",
    "metadata",
    "user",
    "admin",
    "global",
    "token",
    "stake",
    "reward",
    "fee",
    "oracle",
    "position",
    "deposit",
    "data",
];

/// Classify one account: PDA-ness is a pure function of the address bytes
/// (off the ed25519 curve means no private key can exist), and for PDAs a
/// bounded brute-force search tries to recover the derivation.
pub fn classify_account(program: &Pubkey, account: AccountSnapshot) -> ClassifiedAccount {
    let is_pda = !account.address.is_on_curve();
    let (derivation_seeds, derivation_bump) = if is_pda {
        match recover_derivation(program, &account.address) {
            Some((label, bump)) => (Some(vec![label.to_string()]), Some(bump)),
            // Exhausted the catalogue: unclassified, not an error
            None => (None, None),
        }
    } else {
        (None, None)
    };

    ClassifiedAccount {
        account,
        is_pda,
        derivation_seeds,
        derivation_bump,
    }
}

/// Brute-force search over `SEED_CATALOGUE` x bump values 255..=0.
/// Returns the first `(label, bump)` whose derived address matches the
/// target. A miss only means the derivation is unknown: false negatives
/// are expected, and a hit never rules out other derivation paths.
pub fn recover_derivation(program: &Pubkey, target: &Pubkey) -> Option<(&'static str, u8)> {
    for label in SEED_CATALOGUE {
        for bump in (0u8..=255).rev() {
            // Roughly half of all bumps land on the curve and fail
            // derivation outright; those are simply not candidates.
            if let Ok(candidate) =
                Pubkey::create_program_address(&[label.as_bytes(), &[bump]], program)
            {
                if candidate == *target {
                    return Some((label, bump));
                }
            }
        }
    }
    None
}

/// Module tests
#[cfg(test)]
mod tests {
    use super::*;

    /// Compressed ed25519 basepoint, a known on-curve address
    fn on_curve_address() -> Pubkey {
        let mut bytes = [0x66u8; 32];
        bytes[0] = 0x58;
        Pubkey::new_from_array(bytes)
    }

    fn snapshot(address: Pubkey, owner: Pubkey) -> AccountSnapshot {
        AccountSnapshot {
            address,
            owner,
            lamports: 1_000_000,
            data: vec![0u8; 64],
            executable: false,
            last_activity_slot: None,
        }
    }

    /// Test that an ordinary keypair address is not classified as a PDA
    #[test]
    fn test_on_curve_address_is_not_pda() {
        let program = Pubkey::new_unique();
        let classified = classify_account(&program, snapshot(on_curve_address(), program));
        assert!(!classified.is_pda);
        assert!(classified.derivation_seeds.is_none());
        assert!(classified.derivation_bump.is_none());
    }

    /// Test seed recovery round-trip for every catalogue label
    #[test]
    fn test_recovery_round_trip() {
        let program = Pubkey::new_unique();
        for label in ["vault", "pool", "authority"] {
            let (address, bump) = Pubkey::find_program_address(&[label.as_bytes()], &program);
            let recovered = recover_derivation(&program, &address);
            assert_eq!(recovered, Some((label, bump)), "label {}", label);
        }
    }

    /// Test classification of a derivable PDA
    #[test]
    fn test_classify_derivable_pda() {
        let program = Pubkey::new_unique();
        let (address, bump) = Pubkey::find_program_address(&[b"treasury"], &program);
        let classified = classify_account(&program, snapshot(address, program));
        assert!(classified.is_pda);
        assert_eq!(
            classified.derivation_seeds,
            Some(vec!["treasury".to_string()])
        );
        assert_eq!(classified.derivation_bump, Some(bump));
        assert!(!classified.is_unclassified_pda());
    }

    /// Test that a PDA derived outside the catalogue stays unclassified
    #[test]
    fn test_unknown_derivation_is_unclassified() {
        let program = Pubkey::new_unique();
        let (address, _) =
            Pubkey::find_program_address(&[b"definitely-not-in-catalogue"], &program);
        let classified = classify_account(&program, snapshot(address, program));
        assert!(classified.is_pda);
        assert!(classified.derivation_seeds.is_none());
        assert!(classified.is_unclassified_pda());
    }

    /// Test that a PDA of a different program is not attributed to ours
    #[test]
    fn test_foreign_program_pda_not_recovered() {
        let program = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let (address, _) = Pubkey::find_program_address(&[b"vault"], &other);
        assert_eq!(recover_derivation(&program, &address), None);
    }
}

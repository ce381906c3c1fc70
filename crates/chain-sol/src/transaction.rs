//! Legacy Solana transaction wire format.
//!
//! Transactions are built and parsed by hand, no `solana-sdk`. Layout:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use ed25519_dalek::Signer;
use zeroize::Zeroize;

use crate::address::Pubkey;
use crate::error::SolError;

/// Versioned messages set the top bit of the first message byte.
const MESSAGE_VERSION_PREFIX: u8 = 0x80;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value. Returns `(value, bytes_consumed)`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    loop {
        let byte = *data.get(consumed).ok_or_else(|| {
            SolError::SerializationError(
                "unexpected end of data while decoding compact-u16".into(),
            )
        })?;
        consumed += 1;

        value |= ((byte & 0x7f) as u32) << shift;
        shift += 7;

        if byte & 0x80 == 0 || consumed >= 3 {
            break;
        }
    }

    if value > u16::MAX as u32 {
        return Err(SolError::SerializationError(
            "compact-u16 value overflow".into(),
        ));
    }

    Ok((value as u16, consumed))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_writable: bool, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable,
        }
    }
}

/// An instruction before it is compiled into a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// An unsigned transaction that has no fee payer or blockhash yet.
///
/// This is what instruction builders hand back: the caller picks the fee
/// payer and a fresh blockhash at submission time, and may append more
/// instructions first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionDraft {
    pub instructions: Vec<Instruction>,
}

impl TransactionDraft {
    pub fn add_instruction(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    /// Compile into a message ready for signing.
    pub fn compile(
        &self,
        fee_payer: &Pubkey,
        recent_blockhash: &[u8; 32],
    ) -> Result<SolTransaction, SolError> {
        compile_transaction(&self.instructions, fee_payer, recent_blockhash)
    }
}

/// Wrap a single instruction into a draft transaction.
pub fn ix_to_tx(instruction: Instruction) -> TransactionDraft {
    TransactionDraft {
        instructions: vec![instruction],
    }
}

/// A compiled (message-level) transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolTransaction {
    /// All account keys referenced by this transaction, in canonical order:
    ///   1. writable signers
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Pubkey>,

    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned: u8,

    pub recent_blockhash: [u8; 32],

    pub compiled_instructions: Vec<CompiledInstruction>,
}

/// An instruction whose account references are indices into
/// `SolTransaction::account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// An instruction of a compiled transaction with its indices resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstruction<'a> {
    /// Position of the instruction inside the transaction.
    pub index: usize,
    pub accounts: Vec<Pubkey>,
    pub data: &'a [u8],
}

impl SolTransaction {
    /// Every instruction that invokes `program_id`, with account indices
    /// replaced by the actual keys.
    pub fn instructions_for_program(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<ResolvedInstruction<'_>>, SolError> {
        let mut out = Vec::new();
        for (index, ix) in self.compiled_instructions.iter().enumerate() {
            let invoked = self.key_at(ix.program_id_index)?;
            if invoked != *program_id {
                continue;
            }

            let accounts = ix
                .account_indices
                .iter()
                .map(|&i| self.key_at(i))
                .collect::<Result<Vec<_>, _>>()?;

            out.push(ResolvedInstruction {
                index,
                accounts,
                data: &ix.data,
            });
        }
        Ok(out)
    }

    /// The first `num_required_signatures` account keys.
    pub fn signer_keys(&self) -> &[Pubkey] {
        let n = (self.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    fn key_at(&self, index: u8) -> Result<Pubkey, SolError> {
        self.account_keys.get(index as usize).copied().ok_or_else(|| {
            SolError::SerializationError(format!(
                "account index {index} out of range for {} keys",
                self.account_keys.len()
            ))
        })
    }
}

/// A signed transaction as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireTransaction {
    pub signatures: Vec<[u8; 64]>,
    pub message: SolTransaction,
}

// ---------------------------------------------------------------------------
// Transaction building
// ---------------------------------------------------------------------------

/// Compile a set of instructions with a single fee payer.
///
/// The fee payer is always the first signer and is placed at index 0 in the
/// account keys.
pub fn compile_transaction(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    if instructions.is_empty() {
        return Err(SolError::TransactionBuildError(
            "transaction has no instructions".into(),
        ));
    }

    // Instruction account lists are tiny; a Vec keeps first-seen order.
    struct AccountEntry {
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    }

    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    // Fee payer is always signer + writable.
    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        // Program ids are non-signer, read-only accounts.
        upsert(ix.program_id, false, false);
    }

    // Stable sort, so the fee payer stays first among writable signers.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    if entries.len() > u8::MAX as usize {
        return Err(SolError::TransactionBuildError(format!(
            "{} accounts exceeds the legacy message limit",
            entries.len()
        )));
    }

    let num_signers = entries.iter().filter(|e| e.is_signer).count() as u8;
    let num_readonly_signed = entries
        .iter()
        .filter(|e| e.is_signer && !e.is_writable)
        .count() as u8;
    let num_readonly_unsigned = entries
        .iter()
        .filter(|e| !e.is_signer && !e.is_writable)
        .count() as u8;

    let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &Pubkey, what: &str| {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SolError::TransactionBuildError(format!("{what} not in account keys")))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = index_of(&ix.program_id, "program_id")?;
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey, "account"))
            .collect::<Result<Vec<_>, _>>()?;

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(SolTransaction {
        account_keys,
        num_required_signatures: num_signers,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions: compiled,
    })
}

/// Serialize the transaction message (the bytes that get signed).
pub fn serialize_message(tx: &SolTransaction) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(256);

    buf.push(tx.num_required_signatures);
    buf.push(tx.num_readonly_signed);
    buf.push(tx.num_readonly_unsigned);

    buf.extend_from_slice(&encode_compact_u16(len_u16(tx.account_keys.len())?));
    for key in &tx.account_keys {
        buf.extend_from_slice(key.as_ref());
    }

    buf.extend_from_slice(&tx.recent_blockhash);

    buf.extend_from_slice(&encode_compact_u16(len_u16(tx.compiled_instructions.len())?));
    for ix in &tx.compiled_instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&encode_compact_u16(len_u16(ix.account_indices.len())?));
        buf.extend_from_slice(&ix.account_indices);

        buf.extend_from_slice(&encode_compact_u16(len_u16(ix.data.len())?));
        buf.extend_from_slice(&ix.data);
    }

    Ok(buf)
}

/// Sign and serialize a transaction into its wire format.
///
/// `private_keys` are 32-byte Ed25519 seeds; one must be supplied for every
/// required signer, in any order.
pub fn sign_transaction(
    tx: &SolTransaction,
    private_keys: &[[u8; 32]],
) -> Result<Vec<u8>, SolError> {
    let message_bytes = serialize_message(tx)?;

    let signing_keys: Vec<ed25519_dalek::SigningKey> = private_keys
        .iter()
        .map(|key| {
            let mut seed = *key;
            let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
            seed.zeroize();
            signing_key
        })
        .collect();

    let mut signatures = Vec::with_capacity(tx.num_required_signatures as usize);
    for signer in tx.signer_keys() {
        let key = signing_keys
            .iter()
            .find(|k| k.verifying_key().to_bytes() == signer.to_bytes())
            .ok_or_else(|| {
                SolError::SigningError(format!("missing private key for signer {signer}"))
            })?;
        signatures.push(key.sign(&message_bytes).to_bytes());
    }

    let mut wire = Vec::with_capacity(3 + 64 * signatures.len() + message_bytes.len());
    wire.extend_from_slice(&encode_compact_u16(len_u16(signatures.len())?));
    for sig in &signatures {
        wire.extend_from_slice(sig);
    }
    wire.extend_from_slice(&message_bytes);

    Ok(wire)
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

/// Parse a legacy wire-format transaction.
pub fn deserialize_transaction(wire: &[u8]) -> Result<WireTransaction, SolError> {
    let mut reader = ByteReader::new(wire);

    let num_sigs = reader.compact_u16()? as usize;
    let mut signatures = Vec::with_capacity(num_sigs);
    for _ in 0..num_sigs {
        signatures.push(reader.array::<64>()?);
    }

    let header = reader.take(3)?;
    if header[0] & MESSAGE_VERSION_PREFIX != 0 {
        return Err(SolError::SerializationError(
            "versioned transactions are not supported".into(),
        ));
    }

    let num_accounts = reader.compact_u16()? as usize;
    let mut account_keys = Vec::with_capacity(num_accounts);
    for _ in 0..num_accounts {
        account_keys.push(Pubkey::new_from_array(reader.array::<32>()?));
    }

    let recent_blockhash = reader.array::<32>()?;

    let num_instructions = reader.compact_u16()? as usize;
    let mut compiled_instructions = Vec::with_capacity(num_instructions);
    for _ in 0..num_instructions {
        let program_id_index = reader.take(1)?[0];
        let n = reader.compact_u16()? as usize;
        let account_indices = reader.take(n)?.to_vec();
        let len = reader.compact_u16()? as usize;
        let data = reader.take(len)?.to_vec();
        compiled_instructions.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data,
        });
    }

    if !reader.is_empty() {
        return Err(SolError::SerializationError(format!(
            "{} trailing bytes after message",
            reader.remaining()
        )));
    }

    Ok(WireTransaction {
        signatures,
        message: SolTransaction {
            account_keys,
            num_required_signatures: header[0],
            num_readonly_signed: header[1],
            num_readonly_unsigned: header[2],
            recent_blockhash,
            compiled_instructions,
        },
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn len_u16(len: usize) -> Result<u16, SolError> {
    u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("length {len} exceeds compact-u16")))
}

struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SolError> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.data.len());
        match end {
            Some(end) => {
                let out = &self.data[self.pos..end];
                self.pos = end;
                Ok(out)
            }
            None => Err(SolError::SerializationError(format!(
                "transaction truncated: wanted {n} bytes at offset {}",
                self.pos
            ))),
        }
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], SolError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn compact_u16(&mut self) -> Result<u16, SolError> {
        let (value, consumed) = decode_compact_u16(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spl_token::SYSTEM_PROGRAM_ID;

    fn key_for(seed: u8) -> ([u8; 32], Pubkey) {
        let private_key = [seed; 32];
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&private_key);
        (private_key, Pubkey::new_from_array(signing_key.verifying_key().to_bytes()))
    }

    fn sample_instruction(payer: Pubkey, other: Pubkey) -> Instruction {
        Instruction {
            program_id: Pubkey::new_from_array([0x77u8; 32]),
            accounts: vec![
                AccountMeta::new(Pubkey::new_from_array([0x10u8; 32]), true, false),
                AccountMeta::new(payer, true, true),
                AccountMeta::new(other, false, true),
                AccountMeta::new(SYSTEM_PROGRAM_ID, false, false),
            ],
            data: vec![1, 2, 3, 4],
        }
    }

    // -- compact-u16 --------------------------------------------------------

    #[test]
    fn compact_u16_boundaries() {
        assert_eq!(encode_compact_u16(0), vec![0x00]);
        assert_eq!(encode_compact_u16(0x7f), vec![0x7f]);
        assert_eq!(encode_compact_u16(128), vec![0x80, 0x01]);
        assert_eq!(encode_compact_u16(16383), vec![0xff, 0x7f]);
        assert_eq!(encode_compact_u16(16384), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode_compact_u16(u16::MAX), vec![0xff, 0xff, 0x03]);
    }

    #[test]
    fn decode_compact_u16_three_bytes() {
        let (val, len) = decode_compact_u16(&[0x80, 0x80, 0x01]).unwrap();
        assert_eq!(val, 16384);
        assert_eq!(len, 3);
    }

    #[test]
    fn decode_compact_u16_truncated_fails() {
        assert!(decode_compact_u16(&[]).is_err());
        assert!(decode_compact_u16(&[0x80]).is_err());
    }

    // -- compilation --------------------------------------------------------

    #[test]
    fn empty_draft_does_not_compile() {
        let draft = TransactionDraft::default();
        assert!(draft.compile(&Pubkey::default(), &[0u8; 32]).is_err());
    }

    #[test]
    fn compile_orders_accounts_canonically() {
        let (_, payer) = key_for(1);
        let (_, other) = key_for(2);
        let ix = sample_instruction(payer, other);
        let tx = ix_to_tx(ix).compile(&payer, &[0xAA; 32]).unwrap();

        // payer (w+s), other (ro+s), 0x10 (w), system + program (ro)
        assert_eq!(tx.account_keys[0], payer);
        assert_eq!(tx.account_keys[1], other);
        assert_eq!(tx.num_required_signatures, 2);
        assert_eq!(tx.num_readonly_signed, 1);
        assert_eq!(tx.num_readonly_unsigned, 2);
        assert_eq!(tx.signer_keys(), &[payer, other]);
    }

    #[test]
    fn fee_payer_first_even_if_not_in_instruction() {
        let (_, payer) = key_for(9);
        let (_, signer) = key_for(2);
        let ix = sample_instruction(signer, signer);
        let tx = ix_to_tx(ix).compile(&payer, &[0u8; 32]).unwrap();
        assert_eq!(tx.account_keys[0], payer);
    }

    #[test]
    fn instructions_for_program_resolves_keys_in_order() {
        let (_, payer) = key_for(1);
        let (_, other) = key_for(2);
        let ix = sample_instruction(payer, other);
        let tx = ix_to_tx(ix.clone()).compile(&payer, &[0u8; 32]).unwrap();

        let found = tx.instructions_for_program(&ix.program_id).unwrap();
        assert_eq!(found.len(), 1);
        let expected: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(found[0].accounts, expected);
        assert_eq!(found[0].data, &[1, 2, 3, 4]);

        let none = tx.instructions_for_program(&Pubkey::new_from_array([0x01; 32])).unwrap();
        assert!(none.is_empty());
    }

    // -- signing and wire round trip ---------------------------------------

    #[test]
    fn sign_with_all_signers_and_verify() {
        use ed25519_dalek::{Signature, VerifyingKey};

        let (payer_sk, payer) = key_for(1);
        let (other_sk, other) = key_for(2);
        let tx = ix_to_tx(sample_instruction(payer, other))
            .compile(&payer, &[0xCC; 32])
            .unwrap();

        // Order of supplied keys does not matter.
        let wire = sign_transaction(&tx, &[other_sk, payer_sk]).unwrap();
        assert_eq!(wire[0], 0x02);

        let message = serialize_message(&tx).unwrap();
        assert_eq!(&wire[1 + 128..], message.as_slice());

        for (i, signer) in [payer, other].iter().enumerate() {
            let sig_bytes: [u8; 64] = wire[1 + 64 * i..1 + 64 * (i + 1)].try_into().unwrap();
            let vk = VerifyingKey::from_bytes(signer.as_array()).unwrap();
            assert!(vk.verify_strict(&message, &Signature::from_bytes(&sig_bytes)).is_ok());
        }
    }

    #[test]
    fn sign_without_required_key_fails() {
        let (payer_sk, payer) = key_for(1);
        let (_, other) = key_for(2);
        let tx = ix_to_tx(sample_instruction(payer, other))
            .compile(&payer, &[0u8; 32])
            .unwrap();

        let err = sign_transaction(&tx, &[payer_sk]).unwrap_err();
        assert!(err.to_string().contains("missing private key"));
    }

    #[test]
    fn deserialize_recovers_message() {
        let (payer_sk, payer) = key_for(1);
        let (other_sk, other) = key_for(2);
        let tx = ix_to_tx(sample_instruction(payer, other))
            .compile(&payer, &[0xDD; 32])
            .unwrap();
        let wire = sign_transaction(&tx, &[payer_sk, other_sk]).unwrap();

        let parsed = deserialize_transaction(&wire).unwrap();
        assert_eq!(parsed.signatures.len(), 2);
        assert_eq!(parsed.message, tx);
    }

    #[test]
    fn deserialize_rejects_truncated_and_trailing_bytes() {
        let (payer_sk, payer) = key_for(1);
        let (other_sk, other) = key_for(2);
        let tx = ix_to_tx(sample_instruction(payer, other))
            .compile(&payer, &[0u8; 32])
            .unwrap();
        let wire = sign_transaction(&tx, &[payer_sk, other_sk]).unwrap();

        assert!(deserialize_transaction(&wire[..wire.len() - 1]).is_err());

        let mut padded = wire.clone();
        padded.push(0);
        assert!(deserialize_transaction(&padded).is_err());
    }

    #[test]
    fn deserialize_rejects_versioned_message() {
        // zero signatures, then a v0 prefix byte
        let err = deserialize_transaction(&[0x00, 0x80, 0x00, 0x00]).unwrap_err();
        assert!(err.to_string().contains("versioned"));
    }
}

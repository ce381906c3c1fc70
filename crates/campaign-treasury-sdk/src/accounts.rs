//! One struct per operation, with a field for every account role.
//!
//! Field order is the declared account order of the operation. Builders
//! turn a struct into account metas by zipping its keys with the role flags
//! from [`crate::idl`]; the decoder goes the other way.

use chain_sol::{AccountMeta, Pubkey};
use serde::{Deserialize, Serialize};

use crate::idl::Operation;

/// A typed account list for one operation.
pub trait OperationAccounts: Sized {
    const OPERATION: Operation;

    /// Keys in declared order.
    fn keys(&self) -> Vec<Pubkey>;

    /// Rebuild from keys in declared order. Extra trailing keys are ignored;
    /// too few yields `None`.
    fn from_keys(keys: &[Pubkey]) -> Option<Self>;

    /// Account metas with the mutability and signer flags of each role.
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        Self::OPERATION
            .accounts()
            .iter()
            .zip(self.keys())
            .map(|(role, key)| AccountMeta::new(key, role.is_mut, role.is_signer))
            .collect()
    }
}

macro_rules! operation_accounts {
    ($(
        $(#[$meta:meta])*
        $name:ident => $op:ident { $($field:ident),+ $(,)? }
    )+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(pub $field: Pubkey,)+
        }

        impl $name {
            /// Field names, in declared order.
            pub const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];
        }

        impl OperationAccounts for $name {
            const OPERATION: Operation = Operation::$op;

            fn keys(&self) -> Vec<Pubkey> {
                vec![$(self.$field),+]
            }

            fn from_keys(keys: &[Pubkey]) -> Option<Self> {
                let mut keys = keys.iter().copied();
                Some(Self {
                    $($field: keys.next()?,)+
                })
            }
        }
    )+};
}

operation_accounts! {
    CloseDepositEscrowAccounts => CloseDepositEscrow {
        campaign_escrow,
        deposit_escrow,
        deposit_escrow_mint,
        receiver,
        authority,
        token_program,
        system_program,
    }

    CloseDepositRecordAccounts => CloseDepositRecord {
        campaign_escrow,
        treasury_escrow,
        payer,
    }

    CloseEscrowAccounts => CloseEscrow {
        campaign_escrow,
        treasury_escrow,
        receiver,
        payer,
        authority,
        creator,
        token_program,
        system_program,
    }

    /// `deposit_escrow` is the treasury escrow when the deposit currency is
    /// the treasury mint, otherwise the per-currency deposit escrow.
    CreateDepositAccounts => CreateDeposit {
        campaign_escrow,
        deposit_record,
        deposit_escrow,
        deposit_escrow_mint,
        depositor,
        depositor_payment_account,
        mint,
        system_program,
        token_program,
        instruction_sysvar_account,
    }

    CreateDepositEscrowAccounts => CreateDepositEscrow {
        campaign_escrow,
        authority,
        deposit_escrow,
        deposit_escrow_mint,
        system_program,
        token_program,
        rent,
    }

    CreateEscrowAccounts => CreateEscrow {
        campaign_escrow,
        payer,
        authority,
        creator,
        treasury_mint,
        treasury_escrow,
        payout_wallet,
        payout_wallet_owner,
        token_program,
        ata_program,
        system_program,
        rent,
    }

    PayOutFundsAccounts => PayOutFunds {
        campaign_escrow,
        treasury_escrow,
        payer,
        payout_wallet,
        token_program,
        system_program,
    }

    ProcessDepositAccounts => ProcessDeposit {
        campaign_escrow,
        treasury_escrow,
        payer,
    }

    ProcessFullRefundAccounts => ProcessFullRefund {
        campaign_escrow,
        treasury_escrow,
        payer,
    }

    ProcessPartialRefundAccounts => ProcessPartialRefund {
        campaign_escrow,
        treasury_escrow,
        payer,
    }

    UpdateEscrowAccounts => UpdateEscrow {
        campaign_escrow,
        payer,
        authority,
        creator,
        treasury_mint,
        treasury_escrow,
        payout_wallet,
        payout_wallet_owner,
        token_program,
        ata_program,
        system_program,
        rent,
    }

    VetoPayoutPhaseAccounts => VetoPayoutPhase {
        campaign_escrow,
        payer,
        authority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camel_case(snake: &str) -> String {
        let mut out = String::with_capacity(snake.len());
        let mut upper = false;
        for c in snake.chars() {
            if c == '_' {
                upper = true;
            } else if upper {
                out.push(c.to_ascii_uppercase());
                upper = false;
            } else {
                out.push(c);
            }
        }
        out
    }

    fn assert_fields_match<A: OperationAccounts>(fields: &[&str]) {
        let roles: Vec<&str> = A::OPERATION.accounts().iter().map(|r| r.name).collect();
        let fields: Vec<String> = fields.iter().map(|f| camel_case(f)).collect();
        assert_eq!(fields, roles, "{}", A::OPERATION);
    }

    #[test]
    fn field_names_follow_declared_roles() {
        assert_fields_match::<CloseDepositEscrowAccounts>(CloseDepositEscrowAccounts::FIELDS);
        assert_fields_match::<CloseDepositRecordAccounts>(CloseDepositRecordAccounts::FIELDS);
        assert_fields_match::<CloseEscrowAccounts>(CloseEscrowAccounts::FIELDS);
        assert_fields_match::<CreateDepositAccounts>(CreateDepositAccounts::FIELDS);
        assert_fields_match::<CreateDepositEscrowAccounts>(CreateDepositEscrowAccounts::FIELDS);
        assert_fields_match::<CreateEscrowAccounts>(CreateEscrowAccounts::FIELDS);
        assert_fields_match::<PayOutFundsAccounts>(PayOutFundsAccounts::FIELDS);
        assert_fields_match::<ProcessDepositAccounts>(ProcessDepositAccounts::FIELDS);
        assert_fields_match::<ProcessFullRefundAccounts>(ProcessFullRefundAccounts::FIELDS);
        assert_fields_match::<ProcessPartialRefundAccounts>(ProcessPartialRefundAccounts::FIELDS);
        assert_fields_match::<UpdateEscrowAccounts>(UpdateEscrowAccounts::FIELDS);
        assert_fields_match::<VetoPayoutPhaseAccounts>(VetoPayoutPhaseAccounts::FIELDS);
    }

    fn veto_accounts() -> VetoPayoutPhaseAccounts {
        VetoPayoutPhaseAccounts {
            campaign_escrow: Pubkey::new_from_array([1u8; 32]),
            payer: Pubkey::new_from_array([2u8; 32]),
            authority: Pubkey::new_from_array([3u8; 32]),
        }
    }

    #[test]
    fn metas_carry_role_flags() {
        let metas = veto_accounts().to_account_metas();
        assert_eq!(
            metas,
            vec![
                AccountMeta::new(Pubkey::new_from_array([1u8; 32]), true, false),
                AccountMeta::new(Pubkey::new_from_array([2u8; 32]), true, true),
                AccountMeta::new(Pubkey::new_from_array([3u8; 32]), false, true),
            ]
        );
    }

    #[test]
    fn from_keys_inverts_keys() {
        let accounts = veto_accounts();
        assert_eq!(VetoPayoutPhaseAccounts::from_keys(&accounts.keys()), Some(accounts));
    }

    #[test]
    fn from_keys_needs_every_role() {
        let keys = veto_accounts().keys();
        assert!(VetoPayoutPhaseAccounts::from_keys(&keys[..2]).is_none());

        let mut extra = keys.clone();
        extra.push(Pubkey::default());
        assert!(VetoPayoutPhaseAccounts::from_keys(&extra).is_some());
    }

    #[test]
    fn serde_uses_role_names() {
        let json = serde_json::to_value(veto_accounts()).unwrap();
        assert_eq!(json["campaignEscrow"], Pubkey::new_from_array([1u8; 32]).to_string());
    }
}

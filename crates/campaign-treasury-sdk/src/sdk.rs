//! High-level client bound to one deployment.

use chain_sol::{ix_to_tx, AccountReader, Pubkey, SolTransaction, TransactionDraft};

use crate::args::{CreateCampaignEscrowInput, UpdateCampaignEscrowInput};
use crate::decoder::{self, DecodedInstruction};
use crate::environment::{Environment, ProgramIds};
use crate::error::SdkError;
use crate::instructions;
use crate::pdas::{self, PdaResult};
use crate::resolver::{
    self, CloseDepositEscrowParticipants, CloseEscrowParticipants, DepositParticipants,
    EscrowParticipants, VetoParticipants,
};
use crate::state::{fetch_account, CampaignEscrow, DepositRecord};

/// Builds CampaignTreasuryManager transactions for one environment.
///
/// Every `*_tx` method returns an unsigned single-instruction draft; pick a
/// fee payer and blockhash with [`TransactionDraft::compile`].
pub struct CampaignTreasuryManagerSdk<R: AccountReader> {
    reader: R,
    program_ids: ProgramIds,
}

impl<R: AccountReader> CampaignTreasuryManagerSdk<R> {
    pub fn new(reader: R, environment: Environment) -> Self {
        Self::with_program_ids(reader, environment.program_ids())
    }

    /// For deployments outside the built-in environments.
    pub fn with_program_ids(reader: R, program_ids: ProgramIds) -> Self {
        Self {
            reader,
            program_ids,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_ids.program_id
    }

    pub fn bot_signer_authority(&self) -> &Pubkey {
        &self.program_ids.bot_signer_authority
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    // -- addresses and state -------------------------------------------------

    pub fn find_campaign_escrow_pda(&self, campaign_uuid: &str) -> Result<PdaResult, SdkError> {
        pdas::find_campaign_escrow_pda(campaign_uuid, self.program_id())
    }

    pub fn find_treasury_escrow_pda(&self, campaign_uuid: &str) -> Result<PdaResult, SdkError> {
        pdas::find_treasury_escrow_pda(campaign_uuid, self.program_id())
    }

    pub fn find_deposit_escrow_pda(
        &self,
        campaign_uuid: &str,
        deposit_escrow_mint: &Pubkey,
    ) -> Result<PdaResult, SdkError> {
        pdas::find_deposit_escrow_pda(campaign_uuid, deposit_escrow_mint, self.program_id())
    }

    pub fn find_deposit_record_pda(
        &self,
        depositor: &Pubkey,
        mint: &Pubkey,
    ) -> Result<PdaResult, SdkError> {
        pdas::find_deposit_record_pda(depositor, mint, self.program_id())
    }

    pub fn fetch_campaign_escrow_account(
        &self,
        address: &Pubkey,
    ) -> Result<CampaignEscrow, SdkError> {
        fetch_account(&self.reader, address)
    }

    pub fn fetch_campaign_escrow_account_with_campaign_uuid(
        &self,
        campaign_uuid: &str,
    ) -> Result<CampaignEscrow, SdkError> {
        resolver::fetch_campaign_escrow(&self.reader, campaign_uuid, self.program_id())
            .map(|(_, escrow)| escrow)
    }

    pub fn fetch_deposit_record_account(
        &self,
        depositor: &Pubkey,
        mint: &Pubkey,
    ) -> Result<DepositRecord, SdkError> {
        let address = self.find_deposit_record_pda(depositor, mint)?.address;
        fetch_account(&self.reader, &address)
    }

    // -- transactions --------------------------------------------------------

    pub fn create_escrow_tx(
        &self,
        participants: &EscrowParticipants,
        campaign_uuid: &str,
        input: CreateCampaignEscrowInput,
    ) -> Result<TransactionDraft, SdkError> {
        let (accounts, args) =
            resolver::resolve_create_escrow(self.program_id(), participants, campaign_uuid, input)?;
        instructions::create_escrow_ix(self.program_id(), &accounts, args).map(ix_to_tx)
    }

    pub fn update_escrow_tx(
        &self,
        participants: &EscrowParticipants,
        campaign_uuid: &str,
        input: UpdateCampaignEscrowInput,
    ) -> Result<TransactionDraft, SdkError> {
        let (accounts, args) =
            resolver::resolve_update_escrow(self.program_id(), participants, campaign_uuid, input)?;
        instructions::update_escrow_ix(self.program_id(), &accounts, args).map(ix_to_tx)
    }

    pub fn close_escrow_tx(
        &self,
        participants: &CloseEscrowParticipants,
        campaign_uuid: &str,
    ) -> Result<TransactionDraft, SdkError> {
        let accounts =
            resolver::resolve_close_escrow(self.program_id(), participants, campaign_uuid)?;
        instructions::close_escrow_ix(self.program_id(), &accounts).map(ix_to_tx)
    }

    pub fn create_deposit_escrow_tx(
        &self,
        deposit_escrow_mint: &Pubkey,
        campaign_uuid: &str,
    ) -> Result<TransactionDraft, SdkError> {
        let (accounts, args) = resolver::resolve_create_deposit_escrow(
            &self.reader,
            self.program_id(),
            deposit_escrow_mint,
            campaign_uuid,
        )?;
        instructions::create_deposit_escrow_ix(self.program_id(), &accounts, args).map(ix_to_tx)
    }

    pub fn close_deposit_escrow_tx(
        &self,
        participants: &CloseDepositEscrowParticipants,
        campaign_uuid: &str,
    ) -> Result<TransactionDraft, SdkError> {
        let accounts =
            resolver::resolve_close_deposit_escrow(self.program_id(), participants, campaign_uuid)?;
        instructions::close_deposit_escrow_ix(self.program_id(), &accounts).map(ix_to_tx)
    }

    pub fn create_deposit_tx(
        &self,
        participants: &DepositParticipants,
        campaign_uuid: &str,
        deposit_amount: u64,
    ) -> Result<TransactionDraft, SdkError> {
        let (accounts, args) = resolver::resolve_create_deposit(
            &self.reader,
            self.program_id(),
            participants,
            campaign_uuid,
            deposit_amount,
        )?;
        instructions::create_deposit_ix(self.program_id(), &accounts, args).map(ix_to_tx)
    }

    pub fn process_deposit_tx(
        &self,
        payer: &Pubkey,
        campaign_uuid: &str,
    ) -> Result<TransactionDraft, SdkError> {
        let accounts = resolver::resolve_process_deposit(self.program_id(), payer, campaign_uuid)?;
        instructions::process_deposit_ix(self.program_id(), &accounts).map(ix_to_tx)
    }

    pub fn process_full_refund_tx(
        &self,
        payer: &Pubkey,
        campaign_uuid: &str,
    ) -> Result<TransactionDraft, SdkError> {
        let accounts =
            resolver::resolve_process_full_refund(self.program_id(), payer, campaign_uuid)?;
        instructions::process_full_refund_ix(self.program_id(), &accounts).map(ix_to_tx)
    }

    pub fn process_partial_refund_tx(
        &self,
        payer: &Pubkey,
        campaign_uuid: &str,
    ) -> Result<TransactionDraft, SdkError> {
        let accounts =
            resolver::resolve_process_partial_refund(self.program_id(), payer, campaign_uuid)?;
        instructions::process_partial_refund_ix(self.program_id(), &accounts).map(ix_to_tx)
    }

    pub fn pay_out_funds_tx(
        &self,
        payer: &Pubkey,
        campaign_uuid: &str,
    ) -> Result<TransactionDraft, SdkError> {
        let accounts =
            resolver::resolve_pay_out_funds(&self.reader, self.program_id(), payer, campaign_uuid)?;
        instructions::pay_out_funds_ix(self.program_id(), &accounts).map(ix_to_tx)
    }

    pub fn close_deposit_record_tx(
        &self,
        payer: &Pubkey,
        campaign_uuid: &str,
    ) -> Result<TransactionDraft, SdkError> {
        let accounts =
            resolver::resolve_close_deposit_record(self.program_id(), payer, campaign_uuid)?;
        instructions::close_deposit_record_ix(self.program_id(), &accounts).map(ix_to_tx)
    }

    pub fn veto_payout_phase_tx(
        &self,
        participants: &VetoParticipants,
        campaign_uuid: &str,
        payout_phase_index: u8,
    ) -> Result<TransactionDraft, SdkError> {
        let (accounts, args) = resolver::resolve_veto_payout_phase(
            self.program_id(),
            participants,
            campaign_uuid,
            payout_phase_index,
        )?;
        instructions::veto_payout_phase_ix(self.program_id(), &accounts, args).map(ix_to_tx)
    }

    // -- decoding ------------------------------------------------------------

    pub fn decode_transaction(
        &self,
        tx: &SolTransaction,
    ) -> Result<Option<DecodedInstruction>, SdkError> {
        decoder::decode_transaction(self.program_id(), tx)
    }

    pub fn decode_wire_transaction(
        &self,
        wire: &[u8],
    ) -> Result<Option<DecodedInstruction>, SdkError> {
        decoder::decode_wire_transaction(self.program_id(), wire)
    }
}

//! Combined view over voting and non-voting payout phases.

use serde::Serialize;

use crate::state::{
    NonVotingPayoutPhase, PayoutPhases, SharedPayoutPhaseFields, VotingPayoutPhase,
};

/// Either kind of payout phase, borrowed from a [`PayoutPhases`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PayoutPhase<'a> {
    NonVoting(&'a NonVotingPayoutPhase),
    Voting(&'a VotingPayoutPhase),
}

impl<'a> PayoutPhase<'a> {
    pub fn shared_fields(&self) -> &'a SharedPayoutPhaseFields {
        match self {
            PayoutPhase::NonVoting(p) => &p.shared_fields,
            PayoutPhase::Voting(p) => &p.shared_fields,
        }
    }

    pub fn index(&self) -> u8 {
        self.shared_fields().index
    }

    pub fn is_paid_out(&self) -> bool {
        match self {
            PayoutPhase::NonVoting(p) => p.is_paid_out,
            PayoutPhase::Voting(p) => p.is_paid_out,
        }
    }

    pub fn is_vetoed_by_authority(&self) -> bool {
        match self {
            PayoutPhase::NonVoting(p) => p.is_vetoed_by_authority,
            PayoutPhase::Voting(p) => p.is_vetoed_by_authority,
        }
    }

    pub fn is_voting(&self) -> bool {
        matches!(self, PayoutPhase::Voting(_))
    }
}

/// All phases in payout order.
///
/// Non-voting phases come first, then voting, then a stable sort by index;
/// duplicate indices keep that relative order.
pub fn ordered_payout_phases(phases: &PayoutPhases) -> Vec<PayoutPhase<'_>> {
    let mut ordered: Vec<PayoutPhase<'_>> = phases
        .non_voting_payout_phases
        .iter()
        .map(PayoutPhase::NonVoting)
        .chain(phases.voting_payout_phases.iter().map(PayoutPhase::Voting))
        .collect();
    ordered.sort_by_key(|p| p.index());
    ordered
}

/// The first phase in payout order that has not been paid out.
pub fn current_active_payout_phase(phases: &PayoutPhases) -> Option<PayoutPhase<'_>> {
    ordered_payout_phases(phases)
        .into_iter()
        .find(|p| !p.is_paid_out())
}

/// The phase at `position` in payout order.
pub fn payout_phase_at(phases: &PayoutPhases, position: usize) -> Option<PayoutPhase<'_>> {
    ordered_payout_phases(phases).into_iter().nth(position)
}

/// Sum of every phase's payout share, in basis points.
///
/// Widened to `u64`: a decoded account can hold at most `u32::MAX` phases of
/// at most `u16::MAX` each, so the sum cannot overflow.
pub fn total_payout_basis_points(phases: &PayoutPhases) -> u64 {
    phases
        .non_voting_payout_phases
        .iter()
        .map(|p| p.shared_fields.payout_basis_points)
        .chain(
            phases
                .voting_payout_phases
                .iter()
                .map(|p| p.shared_fields.payout_basis_points),
        )
        .map(u64::from)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ONE_HUNDRED_PERCENT_BASIS_POINTS;
    use crate::state::tests::shared;

    fn non_voting(index: u8, paid: bool) -> NonVotingPayoutPhase {
        NonVotingPayoutPhase {
            shared_fields: shared(index, 2_000),
            is_paid_out: paid,
            is_vetoed_by_authority: false,
        }
    }

    fn voting(index: u8, paid: bool) -> VotingPayoutPhase {
        VotingPayoutPhase {
            shared_fields: shared(index, 4_000),
            is_paid_out: paid,
            is_vetoed_by_authority: false,
            voting_start_time: 0,
            veto_votes: 0,
            vote_basis_points_veto_threshold: 5_000,
        }
    }

    #[test]
    fn merges_and_orders_by_index() {
        let phases = PayoutPhases {
            non_voting_payout_phases: vec![non_voting(0, false)],
            voting_payout_phases: vec![voting(2, false), voting(1, false)],
        };

        let ordered = ordered_payout_phases(&phases);
        assert_eq!(ordered.len(), 3);
        for (i, p) in ordered.iter().enumerate() {
            assert_eq!(p.index() as usize, i);
        }
        assert!(!ordered[0].is_voting());
        assert!(ordered[1].is_voting() && ordered[2].is_voting());
    }

    #[test]
    fn interleaved_indices() {
        let phases = PayoutPhases {
            non_voting_payout_phases: vec![non_voting(3, false), non_voting(1, false)],
            voting_payout_phases: vec![voting(0, false), voting(2, false)],
        };
        let indices: Vec<u8> = ordered_payout_phases(&phases).iter().map(|p| p.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn equal_indices_keep_non_voting_first() {
        let phases = PayoutPhases {
            non_voting_payout_phases: vec![non_voting(0, false)],
            voting_payout_phases: vec![voting(0, false)],
        };
        let ordered = ordered_payout_phases(&phases);
        assert!(!ordered[0].is_voting());
        assert!(ordered[1].is_voting());
    }

    #[test]
    fn empty_schedule() {
        let phases = PayoutPhases::default();
        assert!(ordered_payout_phases(&phases).is_empty());
        assert!(current_active_payout_phase(&phases).is_none());
    }

    #[test]
    fn current_active_skips_paid_phases() {
        let phases = PayoutPhases {
            non_voting_payout_phases: vec![non_voting(0, true)],
            voting_payout_phases: vec![voting(2, false), voting(1, true)],
        };
        let active = current_active_payout_phase(&phases).unwrap();
        assert_eq!(active.index(), 2);
        assert!(active.is_voting());
    }

    #[test]
    fn current_active_none_when_all_paid() {
        let phases = PayoutPhases {
            non_voting_payout_phases: vec![non_voting(0, true)],
            voting_payout_phases: vec![voting(1, true)],
        };
        assert!(current_active_payout_phase(&phases).is_none());
    }

    #[test]
    fn phase_at_position() {
        let phases = PayoutPhases {
            non_voting_payout_phases: vec![non_voting(1, false)],
            voting_payout_phases: vec![voting(0, false)],
        };
        assert_eq!(payout_phase_at(&phases, 0).unwrap().index(), 0);
        assert_eq!(payout_phase_at(&phases, 1).unwrap().index(), 1);
        assert!(payout_phase_at(&phases, 2).is_none());
    }

    #[test]
    fn basis_points_total() {
        let phases = PayoutPhases {
            non_voting_payout_phases: vec![non_voting(0, false)],
            voting_payout_phases: vec![voting(1, false), voting(2, false)],
        };
        assert_eq!(
            total_payout_basis_points(&phases),
            u64::from(ONE_HUNDRED_PERCENT_BASIS_POINTS)
        );
    }

    #[test]
    fn basis_points_total_exceeds_u32() {
        let phase = NonVotingPayoutPhase {
            shared_fields: SharedPayoutPhaseFields {
                payout_basis_points: u16::MAX,
                ..shared(0, 0)
            },
            is_paid_out: false,
            is_vetoed_by_authority: false,
        };
        let phases = PayoutPhases {
            non_voting_payout_phases: vec![phase; 70_000],
            voting_payout_phases: vec![],
        };
        let total = total_payout_basis_points(&phases);
        assert_eq!(total, 70_000 * u64::from(u16::MAX));
        assert!(total > u64::from(u32::MAX));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let phase = voting(1, false);
        let json = serde_json::to_value(PayoutPhase::Voting(&phase)).unwrap();
        assert_eq!(json["kind"], "voting");
        assert_eq!(json["sharedFields"]["index"], 1);
    }
}

//! Unit tests for cw-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ArcId, TripId};

    #[test]
    fn index_roundtrip() {
        let id = TripId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(TripId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(TripId(0) < TripId(1));
        assert!(ArcId(100) > ArcId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(TripId::INVALID.0, u32::MAX);
        assert_eq!(ArcId::INVALID.0, u32::MAX);
    }

    #[test]
    fn sink_is_arc_zero() {
        assert_eq!(ArcId::SINK, ArcId(0));
        assert!(ArcId::SINK.is_sink());
        assert!(!ArcId(1).is_sink());
    }

    #[test]
    fn display() {
        assert_eq!(TripId(7).to_string(), "TripId(7)");
    }
}

#[cfg(test)]
mod error {
    use crate::{CwError, TripId};

    #[test]
    fn messages_name_the_offender() {
        let err = CwError::TripNotFound(TripId(3));
        assert_eq!(err.to_string(), "trip TripId(3) not found");
    }
}

#[cfg(test)]
mod tolerance {
    use crate::{Tolerances, CONSTR_TOLERANCE, TOLERANCE};

    #[test]
    fn defaults_match_constants() {
        let t = Tolerances::default();
        assert_eq!(t.eps, TOLERANCE);
        assert_eq!(t.constr, CONSTR_TOLERANCE);
    }

    #[test]
    fn tie_threshold_is_combined() {
        let t = Tolerances::new(1e-6, 1e-3);
        assert!((t.tie_threshold() - (1e-3 - 1e-6)).abs() < 1e-15);
    }

    #[test]
    fn tie_threshold_is_positive_for_defaults() {
        assert!(Tolerances::default().tie_threshold() > 0.0);
    }
}

//! Property tests for the controller's clamping and feedback rules

use ezplayer::engine::EngineEvent;
use ezplayer::player::ShellCommand;
use ezplayer_integration_tests::rig::Rig;
use proptest::prelude::*;
use std::path::PathBuf;

fn loaded_rig() -> Rig {
    let mut rig = Rig::new();
    rig.controller.drop_files(vec![PathBuf::from("/m/a.mp4")]);
    rig
}

proptest! {
    #[test]
    fn volume_always_within_range(volume in -1000.0f64..1000.0) {
        let mut rig = Rig::new();
        let applied = rig.controller.set_volume(volume);
        prop_assert!((0.0..=100.0).contains(&applied));
        prop_assert_eq!(rig.controller.state().volume, applied);
        prop_assert_eq!(rig.engine.lock().volume as f64, applied.round());
    }

    #[test]
    fn volume_steps_stay_in_range(ups in proptest::collection::vec(any::<bool>(), 0..40)) {
        let mut rig = Rig::new();
        for up in ups {
            let command = if up { ShellCommand::VolumeUp } else { ShellCommand::VolumeDown };
            rig.controller.dispatch(command);
            let volume = rig.controller.state().volume;
            prop_assert!((0.0..=100.0).contains(&volume));
        }
    }

    #[test]
    fn nudges_stay_in_unit_range(start in 0.0f32..=1.0, forward in any::<bool>()) {
        let mut rig = loaded_rig();
        rig.engine.lock().position = start;
        rig.controller.dispatch(if forward { ShellCommand::Forward } else { ShellCommand::Rewind });

        let seeks = rig.engine.lock().seeks();
        prop_assert_eq!(seeks.len(), 1);
        prop_assert!((0.0..=1.0).contains(&seeks[0]));
    }

    #[test]
    fn engine_positions_never_seek(fractions in proptest::collection::vec(0.0f32..=1.0, 1..50)) {
        let mut rig = loaded_rig();
        for fraction in fractions {
            rig.controller.handle_engine_event(EngineEvent::PositionChanged { fraction });
            rig.controller.on_slider_value_changed(fraction);
        }
        prop_assert!(rig.engine.lock().seeks().is_empty());
    }

    #[test]
    fn user_drag_seeks_exactly_once(fraction in 0.0f32..=1.0) {
        let mut rig = loaded_rig();
        // The last programmatic write was the reset to 0 on load.
        prop_assume!(fraction != 0.0);
        rig.controller.on_slider_value_changed(fraction);
        prop_assert_eq!(rig.engine.lock().seeks(), vec![fraction]);
    }
}

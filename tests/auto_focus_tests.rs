//! Auto-focus scheduling scenarios driven through the engine facade.

mod common;

use common::{Sim, enabled_config};
use par_term_attention::{AttentionConfig, AttentionEvent, SchedulerPhase, WatchMode};

#[test]
fn test_idle_commit_fires_after_idle_wait() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);
    assert_eq!(sim.engine.snapshot().phase, SchedulerPhase::WaitingIdle);

    sim.advance_to(499);
    assert!(sim.focused.is_empty());

    sim.advance_to(500);
    assert_eq!(sim.focused, vec![(500, 1, 10)]);

    // The host echoed the focus change, which clears the mark.
    assert!(!sim.engine.needs_attention(1));
    let snapshot = sim.engine.snapshot();
    assert_eq!(snapshot.phase, SchedulerPhase::FocusLocked);
    assert_eq!(snapshot.pending.focus_lock, Some(1));
    assert!(!snapshot.pending.pending);
}

#[test]
fn test_reading_surface_blocks_focus_steal() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.host.set_focused(Some(1));
    sim.host.set_pointer_inside(Some(1));

    sim.bell(2);
    assert_eq!(sim.engine.snapshot().phase, SchedulerPhase::PausedReading);

    sim.advance_to(600_000);
    assert!(sim.focused.is_empty());

    sim.pointer_exit(1);
    sim.advance_to(600_999);
    assert!(sim.focused.is_empty());
    sim.advance_to(601_000);
    assert_eq!(sim.commits(), vec![2]);
}

#[test]
fn test_resume_restarts_on_typing() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.host.set_focused(Some(1));
    sim.host.set_pointer_inside(Some(1));
    sim.bell(2);

    sim.pointer_exit(1);
    sim.advance_to(400);
    sim.input();

    sim.advance_to(1000);
    assert!(sim.focused.is_empty(), "resume fired at the undebounced deadline");
    sim.advance_to(1399);
    assert!(sim.focused.is_empty());
    sim.advance_to(1400);
    assert_eq!(sim.focused, vec![(1400, 2, 11)]);
}

#[test]
fn test_resume_keeps_pushing_while_user_is_active() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.host.set_focused(Some(1));
    sim.bell(2);

    for at in [400, 1200, 2000] {
        sim.advance_to(at);
        sim.input();
    }
    sim.advance_to(2999);
    assert!(sim.focused.is_empty());
    sim.advance_to(3000);
    assert_eq!(sim.commits(), vec![2]);
}

#[test]
fn test_stale_timer_is_a_noop() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);
    let (_, stale) = sim.queued_timers()[0];

    sim.advance_to(100);
    sim.bell(3);

    let before = sim.engine.snapshot();
    sim.send(AttentionEvent::TimerFired(stale));
    assert_eq!(sim.engine.snapshot(), before);
    assert!(sim.focused.is_empty());

    sim.advance_to(600);
    assert_eq!(sim.focused, vec![(600, 3, 10)]);
}

#[test]
fn test_double_mark_commits_once() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);
    sim.bell(1);

    sim.advance_to(60_000);
    assert_eq!(sim.commits(), vec![1]);
}

#[test]
fn test_pointer_inside_never_steals() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.host.set_focused(Some(1));
    sim.pointer_enter(1);

    sim.bell(2);
    for step in 1..=60u64 {
        sim.advance_to(step * 60_000);
        if step % 7 == 0 {
            sim.bell(3);
        }
        if step % 5 == 0 {
            sim.input();
        }
    }
    assert!(sim.focused.is_empty());
    assert_eq!(sim.engine.snapshot().phase, SchedulerPhase::PausedReading);
}

#[test]
fn test_focused_idle_bound_ends_pause() {
    let config = AttentionConfig {
        auto_focus_attention_resume_on_focused_idle_ms: Some(2000),
        ..enabled_config(500, 1000)
    };
    let mut sim = Sim::new(config);
    sim.host.set_focused(Some(1));
    sim.host.set_pointer_inside(Some(1));
    sim.bell(2);

    sim.advance_to(2000);
    assert!(matches!(
        sim.engine.snapshot().phase,
        SchedulerPhase::WaitingResume {
            bypass_focus_pause: true
        }
    ));
    sim.advance_to(3000);
    assert_eq!(sim.focused, vec![(3000, 2, 11)]);
}

#[test]
fn test_focus_lock_protects_autofocused_surface() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);
    sim.advance_to(500);
    assert_eq!(sim.commits(), vec![1]);
    // The surface appeared under the pointer; no crossing was reported.
    sim.host.set_pointer_inside(Some(1));

    sim.advance_to(1000);
    sim.bell(2);
    assert_eq!(sim.engine.snapshot().phase, SchedulerPhase::FocusLocked);
    sim.advance_to(60_000);
    assert_eq!(sim.commits(), vec![1]);

    // The user starts and stops reading the locked surface.
    sim.pointer_enter(1);
    assert_eq!(sim.engine.snapshot().pending.focus_lock, None);
    sim.pointer_exit(1);
    sim.advance_to(61_000);
    assert_eq!(sim.commits(), vec![1, 2]);
}

#[test]
fn test_deactivation_holds_until_reactivated() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);

    sim.advance_to(200);
    sim.host.set_frontmost(false);
    sim.send(AttentionEvent::AppActivationChanged { active: false });
    assert_eq!(sim.engine.snapshot().phase, SchedulerPhase::Held);

    sim.advance_to(5000);
    assert!(sim.focused.is_empty());
    assert!(sim.engine.snapshot().pending.pending);

    sim.host.set_frontmost(true);
    sim.send(AttentionEvent::AppActivationChanged { active: true });
    sim.advance_to(5500);
    assert_eq!(sim.focused, vec![(5500, 1, 10)]);
}

#[test]
fn test_modal_blocks_commit() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);

    sim.advance_to(100);
    sim.host.set_modal(true);
    sim.send(AttentionEvent::ModalShown);
    sim.advance_to(2000);
    assert!(sim.focused.is_empty());

    sim.host.set_modal(false);
    sim.send(AttentionEvent::ModalHidden);
    sim.advance_to(2500);
    assert_eq!(sim.commits(), vec![1]);
}

#[test]
fn test_modal_open_drops_incoming_mark() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.host.set_modal(true);
    sim.bell(1);

    assert!(sim.engine.needs_attention(1));
    assert!(!sim.engine.snapshot().pending.pending);
    assert!(sim.queued_timers().is_empty());
}

#[test]
fn test_disabling_auto_focus_cancels_and_reenabling_resumes() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);

    sim.advance_to(100);
    let off = AttentionConfig {
        auto_focus_attention: false,
        ..enabled_config(500, 1000)
    };
    let commands = sim.engine.update_config(off, sim.now, &sim.host);
    assert!(commands.is_empty());

    sim.advance_to(10_000);
    assert!(sim.focused.is_empty());

    let commands = sim
        .engine
        .update_config(enabled_config(500, 1000), sim.now, &sim.host);
    assert_eq!(commands.len(), 1, "re-enabling re-arms the idle wait");
    assert!(sim.engine.snapshot().auto_focus_enabled);
}

#[test]
fn test_config_change_rereads_durations() {
    let mut sim = Sim::new(enabled_config(5000, 1000));
    sim.bell(1);
    sim.advance_to(100);

    sim.engine
        .config_handle()
        .store(std::sync::Arc::new(enabled_config(500, 1000)));
    sim.send(AttentionEvent::ConfigChanged);

    sim.advance_to(600);
    assert_eq!(sim.focused, vec![(600, 1, 10)]);
}

#[test]
fn test_other_group_mark_is_not_autofocused() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(4);

    sim.advance_to(10_000);
    assert!(sim.focused.is_empty());
    assert!(sim.engine.needs_attention(4));
}

#[test]
fn test_dismiss_drops_pending_attention() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);
    sim.advance_to(100);
    sim.send(AttentionEvent::Dismiss { surface: 1 });

    let snapshot = sim.engine.snapshot();
    assert_eq!(snapshot.phase, SchedulerPhase::Idle);
    assert!(!snapshot.pending.pending);
    sim.advance_to(10_000);
    assert!(sim.focused.is_empty());
}

#[test]
fn test_closed_surface_is_skipped_at_commit() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);
    sim.advance_to(10);
    sim.bell(3);

    sim.advance_to(100);
    sim.host.remove_surface(3);
    sim.send(AttentionEvent::SurfaceClosed { surface: 3 });
    assert!(sim.engine.snapshot().pending.pending);

    sim.advance_to(510);
    assert_eq!(sim.commits(), vec![1]);
}

#[test]
fn test_marked_watch_mode_follows_title_tags() {
    let config = AttentionConfig {
        auto_focus_attention_watch_mode: WatchMode::Marked,
        ..enabled_config(500, 1000)
    };
    let mut sim = Sim::new(config);
    sim.host.set_title(2, "build [agent:claude]");

    sim.bell(1);
    assert!(!sim.engine.snapshot().pending.pending);

    sim.bell(2);
    sim.advance_to(500);
    assert_eq!(sim.commits(), vec![2]);
}

#[test]
fn test_switching_surfaces_counts_as_done_reading() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.host.set_focused(Some(1));
    sim.host.set_pointer_inside(Some(1));
    sim.bell(2);

    sim.advance_to(300);
    sim.focus(Some(3));
    sim.advance_to(1299);
    assert!(sim.focused.is_empty());
    sim.advance_to(1300);
    assert_eq!(sim.commits(), vec![2]);
}

#[test]
fn test_min_age_holds_young_marks() {
    let config = AttentionConfig {
        auto_focus_attention_min_age_ms: 2000,
        ..enabled_config(500, 1000)
    };
    let mut sim = Sim::new(config);
    sim.bell(1);

    sim.advance_to(1000);
    assert_eq!(sim.engine.snapshot().phase, SchedulerPhase::WaitingMinAge);
    sim.advance_to(2000);
    assert_eq!(sim.focused, vec![(2000, 1, 10)]);
}

#[test]
fn test_new_attention_after_commit_waits_resume_delay() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.bell(1);
    sim.advance_to(500);
    assert_eq!(sim.commits(), vec![1]);

    // Pointer never entered surface 1, so the lock does not hold.
    sim.advance_to(600);
    sim.bell(3);
    sim.advance_to(60_000);
    assert_eq!(sim.focused, vec![(500, 1, 10), (1600, 3, 10)]);
    assert_eq!(sim.engine.snapshot().pending.focus_lock, Some(3));
}

#[test]
fn test_closing_read_surface_releases_pending_attention() {
    let mut sim = Sim::new(enabled_config(500, 1000));
    sim.focus(Some(1));
    sim.pointer_enter(1);
    sim.bell(3);
    assert_eq!(sim.engine.snapshot().phase, SchedulerPhase::PausedReading);

    sim.host.remove_surface(1);
    sim.send(AttentionEvent::SurfaceClosed { surface: 1 });
    sim.focus(Some(2));
    sim.advance_to(60_000);
    assert_eq!(sim.commits(), vec![3]);
}

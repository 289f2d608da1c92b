use super::*;
use std::thread;

#[test]
fn test_limit_constructors() {
    let depth_only = SearchLimits::depth(5);
    assert_eq!(depth_only.depth, 5);
    assert!(depth_only.move_time.is_none());
    assert!(depth_only.time_control.time_limit().is_none());

    let both = SearchLimits::depth_and_time(4, Duration::from_millis(100));
    assert_eq!(both.move_time, Some(Duration::from_millis(100)));
    assert_eq!(both.time_control.time_limit(), both.move_time);

    assert_eq!(SearchLimits::time(Duration::from_millis(1)).depth, u32::MAX);
    assert_eq!(SearchLimits::default().depth, 4);
}

#[test]
fn test_expiry_raises_the_flag() {
    let tc = TimeControl::new(Some(Duration::from_millis(10)));
    assert_eq!(tc.elapsed(), Duration::ZERO);
    tc.start();
    assert!(!tc.check_time());

    thread::sleep(Duration::from_millis(20));
    assert!(tc.check_time());
    assert!(tc.is_stopped());
    assert_eq!(tc.fraction_used(), 1.0);
}

#[test]
fn test_no_limit_never_expires() {
    let tc = TimeControl::new(None);
    tc.start();
    thread::sleep(Duration::from_millis(10));
    assert!(!tc.check_time());
    assert_eq!(tc.fraction_used(), 0.0);
}

#[test]
fn test_stop_before_start_is_kept() {
    let limits = SearchLimits::depth(3);
    limits.time_control.stop();
    limits.start();
    assert!(limits.should_stop());
}

#[test]
fn test_clones_share_flag_across_threads() {
    let tc = TimeControl::new(None);
    let remote = tc.clone();
    thread::spawn(move || remote.stop())
        .join()
        .expect("stopper thread panicked");
    assert!(tc.is_stopped());
}

#[test]
fn test_with_time_limit_shares_clock() {
    let tc = TimeControl::new(None);
    let limited = tc.clone().with_time_limit(Some(Duration::from_millis(5)));
    tc.start();
    thread::sleep(Duration::from_millis(10));
    assert!(limited.check_time());
    assert!(tc.is_stopped());
}

#[test]
fn test_check_interval() {
    let tc = TimeControl::new(None).with_check_interval(4);
    assert!(tc.should_check_time(0));
    assert!(!tc.should_check_time(3));
    assert!(tc.should_check_time(8));
    // Zero is clamped so the modulus is never zero
    assert!(TimeControl::default().with_check_interval(0).should_check_time(7));
}

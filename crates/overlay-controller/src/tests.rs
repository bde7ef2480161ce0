#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use overlay_core::{KeyboardNotification, ManualClock, PanEvent, Rect, Size, Vec2};
    use web_time::Duration;

    use crate::*;

    struct Card(Size);

    impl OverlayContent for Card {
        fn size(&self) -> Size {
            self.0
        }
    }

    struct Fixture {
        clock: ManualClock,
        host: OverlayHost,
        window: SurfaceId,
    }

    impl Fixture {
        fn new() -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let clock = ManualClock::default();
            let host = OverlayHost::new(clock.clone());
            let window = host.add_surface(SurfaceKind::Window, Rect::new(0.0, 0.0, 400.0, 800.0));
            Self {
                clock,
                host,
                window,
            }
        }

        fn overlay(&self, size: Size, config: OverlayConfig) -> OverlayController {
            OverlayController::new(Card(size), Size::ZERO).with_config(config)
        }

        fn advance(&self, ms: u64) {
            self.clock.advance(Duration::from_millis(ms));
            self.host.tick();
        }

        fn settle(&self) {
            for _ in 0..40 {
                if !self.host.is_animating() {
                    return;
                }
                self.advance(50);
            }
        }

        fn present(&self, c: &OverlayController) {
            self.host.attach(c, self.window, PresentOptions::default()).unwrap();
            self.settle();
        }
    }

    type Events = Rc<RefCell<Vec<&'static str>>>;

    fn record(c: &OverlayController) -> Events {
        let events: Events = Rc::new(RefCell::new(Vec::new()));
        let e = events.clone();
        c.on_will_present(move |_| e.borrow_mut().push("will_present"));
        let e = events.clone();
        c.on_did_present(move |_| e.borrow_mut().push("did_present"));
        let e = events.clone();
        c.on_will_dismiss(move |_| e.borrow_mut().push("will_dismiss"));
        let e = events.clone();
        c.on_did_dismiss(move |_| e.borrow_mut().push("did_dismiss"));
        events
    }

    fn count(events: &Events, name: &str) -> usize {
        events.borrow().iter().filter(|e| **e == name).count()
    }

    fn sheet() -> OverlayConfig {
        OverlayConfig::default()
            .with_layout_position(LayoutPosition::Bottom)
            .with_presentation_style(SlideStyle::FromBottom)
    }

    #[test]
    fn test_present_lifecycle_order() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(400.0, 200.0), sheet());
        let events = record(&c);
        let done = Rc::new(Cell::new(false));

        let d = done.clone();
        let done_cb: Completion = Box::new(move || d.set(true));
        f.host
            .attach_with(&c, f.window, PresentOptions::default(), Some(done_cb))
            .unwrap();

        assert_eq!(*events.borrow(), vec!["will_present"]);
        assert_eq!(c.phase(), Phase::Presenting);
        assert!(!c.is_presenting());
        assert_eq!(c.mask_alpha(), 0.0);
        // Starts just below the surface.
        assert_eq!(c.content_center(), Vec2::new(200.0, 900.0));

        f.advance(249);
        assert_eq!(c.phase(), Phase::Presenting);
        assert!(!done.get());

        f.advance(1);
        assert_eq!(*events.borrow(), vec!["will_present", "did_present"]);
        assert!(done.get());
        assert!(c.is_presenting());
        assert_eq!(c.content_center(), Vec2::new(200.0, 700.0));
        assert_eq!(c.mask_alpha(), 1.0);
    }

    #[test]
    fn test_present_twice_presents_once() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(200.0, 200.0), OverlayConfig::default());
        let events = record(&c);

        f.host.attach(&c, f.window, PresentOptions::default()).unwrap();
        f.advance(100);
        c.present(PresentOptions::default()).unwrap();
        f.host.attach(&c, f.window, PresentOptions::default()).unwrap();
        f.settle();

        assert_eq!(c.phase(), Phase::Presented);
        assert_eq!(count(&events, "will_present"), 1);
        assert_eq!(count(&events, "did_present"), 1);
        assert_eq!(f.host.layers(f.window).len(), 2);
    }

    #[test]
    fn test_dismiss_without_present_is_noop() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(200.0, 200.0), OverlayConfig::default());
        let events = record(&c);

        c.dismiss(DismissOptions::default());
        f.host.detach(&c, DismissOptions::default());
        c.handle_mask_tap(Vec2::ZERO);
        f.settle();

        assert!(events.borrow().is_empty());
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.mask().is_none());
    }

    #[test]
    fn test_dismiss_during_entrance_is_ignored() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(200.0, 200.0), OverlayConfig::default());
        let events = record(&c);

        f.host.attach(&c, f.window, PresentOptions::default()).unwrap();
        f.advance(100);
        c.dismiss(DismissOptions::default());
        f.settle();

        assert_eq!(c.phase(), Phase::Presented);
        assert_eq!(count(&events, "will_dismiss"), 0);
    }

    #[test]
    fn test_dismiss_lifecycle_and_release() {
        let f = Fixture::new();
        let c = f.overlay(
            Size::new(400.0, 200.0),
            sheet().with_dismissal_style(SlideStyle::FromTop),
        );
        let events = record(&c);
        f.present(&c);

        let done = Rc::new(Cell::new(false));
        let d = done.clone();
        c.dismiss_with(DismissOptions::default(), Some(Box::new(move || d.set(true))));
        assert_eq!(c.phase(), Phase::Dismissing);
        assert!(c.is_presenting());

        f.advance(250);
        assert_eq!(
            *events.borrow(),
            vec!["will_present", "did_present", "will_dismiss", "did_dismiss"]
        );
        assert!(done.get());
        assert_eq!(c.phase(), Phase::Idle);
        assert!(!c.is_presenting());
        // Left through the top edge.
        assert_eq!(c.content_center(), Vec2::new(200.0, -100.0));
        assert!(!c.is_attached());
        assert!(f.host.layers(f.window).is_empty());
        assert!(!f.host.has_overlays(f.window));
    }

    #[test]
    fn test_present_dismiss_present_same_rest() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(300.0, 120.0), sheet().with_layout_offset(16.0));

        f.present(&c);
        let first = c.content_center();

        c.dismiss(DismissOptions::default());
        f.settle();
        assert_eq!(c.phase(), Phase::Idle);

        c.present(PresentOptions::default()).unwrap();
        f.settle();
        assert_eq!(c.phase(), Phase::Presented);
        assert_eq!(c.content_center(), first);
        assert_eq!(first, Vec2::new(200.0, 724.0));
    }

    #[test]
    fn test_scale_style_appearance() {
        let f = Fixture::new();
        let c = f.overlay(
            Size::new(200.0, 200.0),
            OverlayConfig::default().with_presentation_style(SlideStyle::Scale { factor: 0.5 }),
        );

        f.host.attach(&c, f.window, PresentOptions::default()).unwrap();
        assert_eq!(c.content_alpha(), 0.0);
        assert_eq!(c.content_scale(), 0.5);
        assert_eq!(c.visual_frame().w, 100.0);
        assert_eq!(c.content_center(), Vec2::new(200.0, 400.0));

        f.settle();
        assert_eq!(c.content_alpha(), 1.0);
        assert_eq!(c.content_scale(), 1.0);

        c.dismiss(DismissOptions::default());
        f.advance(125);
        assert!(c.content_alpha() < 1.0);
        assert!(c.content_scale() < 1.0);

        f.settle();
        // Reset once gone.
        assert_eq!(c.content_alpha(), 1.0);
        assert_eq!(c.content_scale(), 1.0);
    }

    #[test]
    fn test_bounced_mask_leads_content() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(400.0, 200.0), sheet());

        f.host
            .attach(&c, f.window, PresentOptions::default().bounced())
            .unwrap();
        f.advance(63);
        assert_eq!(c.mask_alpha(), 1.0);
        assert_eq!(c.phase(), Phase::Presenting);

        f.advance(187);
        assert_eq!(c.phase(), Phase::Presented);
        assert_eq!(c.content_center(), Vec2::new(200.0, 700.0));
    }

    #[test]
    fn test_mask_backdrop() {
        let f = Fixture::new();
        let c = f.overlay(
            Size::new(200.0, 200.0),
            OverlayConfig::default().with_mask_style(MaskStyle::DarkBlur),
        );
        f.present(&c);

        let mask = c.mask().unwrap();
        assert_eq!(mask.frame, Rect::new(0.0, 0.0, 400.0, 800.0));
        assert_eq!(mask.backdrop, Backdrop::Blur(BlurStyle::Dark));

        c.set_mask_style(MaskStyle::Black { opacity: 0.5 });
        assert_eq!(
            c.mask().unwrap().backdrop,
            Backdrop::Solid(overlay_core::Color(0, 0, 0, 128))
        );
    }

    fn levels(f: &Fixture, named: &[&OverlayController]) -> Vec<WindowLevel> {
        f.host
            .z_order(f.window)
            .into_iter()
            .filter_map(|id| named.iter().find(|c| c.id() == id))
            .map(|c| c.window_level())
            .collect()
    }

    #[test]
    fn test_stacking_by_window_level() {
        let f = Fixture::new();
        let size = Size::new(200.0, 200.0);
        let normal = f.overlay(size, OverlayConfig::default());
        let high = f.overlay(size, OverlayConfig::default().with_window_level(WindowLevel::High));
        let low = f.overlay(size, OverlayConfig::default().with_window_level(WindowLevel::Low));

        for c in [&normal, &high, &low] {
            f.host.attach(c, f.window, PresentOptions::default()).unwrap();
        }
        f.settle();

        insta::assert_debug_snapshot!(levels(&f, &[&normal, &high, &low]), @r"
        [
            Low,
            Normal,
            High,
        ]
        ");

        // Each mask sits directly under its content.
        let layers = f.host.layers(f.window);
        assert_eq!(layers[0], Layer::mask(low.id()));
        assert_eq!(layers[1], Layer::content(low.id()));

        f.host.detach(&normal, DismissOptions::default());
        f.settle();

        insta::assert_debug_snapshot!(levels(&f, &[&normal, &high, &low]), @r"
        [
            Low,
            High,
        ]
        ");
        assert_eq!(f.host.layers(f.window).len(), 4);
        assert_eq!(f.host.overlays(f.window), vec![high.clone(), low.clone()]);
    }

    #[test]
    fn test_equal_levels_keep_attach_order() {
        let f = Fixture::new();
        let size = Size::new(200.0, 200.0);
        let a = f.overlay(size, OverlayConfig::default());
        let b = f.overlay(size, OverlayConfig::default());
        let low = f.overlay(size, OverlayConfig::default().with_window_level(WindowLevel::VeryLow));
        let c = f.overlay(size, OverlayConfig::default());

        for o in [&a, &b, &low, &c] {
            f.host.attach(o, f.window, PresentOptions::default()).unwrap();
        }

        assert_eq!(f.host.z_order(f.window), vec![low.id(), a.id(), b.id(), c.id()]);
    }

    #[test]
    fn test_attach_errors() {
        let f = Fixture::new();
        let other = f
            .host
            .add_surface(SurfaceKind::View, Rect::new(0.0, 400.0, 400.0, 400.0));
        let c = f.overlay(Size::new(100.0, 100.0), OverlayConfig::default());

        assert_eq!(
            c.present(PresentOptions::default()),
            Err(OverlayError::NoHostSurface(c.id()))
        );

        f.host.attach(&c, f.window, PresentOptions::default()).unwrap();
        assert_eq!(
            f.host.attach(&c, other, PresentOptions::default()),
            Err(OverlayError::AttachedElsewhere {
                controller: c.id(),
                surface: f.window,
            })
        );

        assert!(f.host.remove_surface(other));
        let d = f.overlay(Size::new(100.0, 100.0), OverlayConfig::default());
        assert_eq!(
            f.host.attach(&d, other, PresentOptions::default()),
            Err(OverlayError::SurfaceNotFound(other))
        );
        assert!(!d.is_attached());
    }

    #[test]
    fn test_reattach_to_another_surface_after_dismiss() {
        let f = Fixture::new();
        let side = f
            .host
            .add_surface(SurfaceKind::View, Rect::new(0.0, 0.0, 200.0, 200.0));
        let c = f.overlay(Size::new(100.0, 100.0), OverlayConfig::default());

        f.present(&c);
        c.dismiss(DismissOptions::default());
        f.settle();

        f.host.attach(&c, side, PresentOptions::default()).unwrap();
        f.settle();
        assert_eq!(c.host_surface(), Some(side));
        assert_eq!(c.content_center(), Vec2::new(100.0, 100.0));
        assert_eq!(c.mask().unwrap().frame, Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn test_mask_tap() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(400.0, 200.0), OverlayConfig::default());
        f.present(&c);

        // Inside the content: not a mask tap.
        c.handle_mask_tap(Vec2::new(200.0, 400.0));
        assert_eq!(c.phase(), Phase::Presented);

        c.set_dismiss_on_mask_touched(false);
        c.handle_mask_tap(Vec2::new(200.0, 100.0));
        assert_eq!(c.phase(), Phase::Presented);

        c.set_dismiss_on_mask_touched(true);
        c.handle_mask_tap(Vec2::new(200.0, 100.0));
        assert_eq!(c.phase(), Phase::Dismissing);
        f.settle();
        assert!(!f.host.has_overlays(f.window));
    }

    #[test]
    fn test_hit_test_picks_topmost() {
        let f = Fixture::new();
        let size = Size::new(100.0, 100.0);
        let high = f.overlay(size, OverlayConfig::default().with_window_level(WindowLevel::High));
        let normal = f.overlay(size, OverlayConfig::default());
        f.present(&high);
        f.present(&normal);

        let hit = f.host.hit_test(f.window, Vec2::new(10.0, 10.0)).unwrap();
        assert_eq!(hit, high);
        assert!(f.host.hit_test(f.window, Vec2::new(500.0, 10.0)).is_none());
    }

    #[test]
    fn test_tap_during_entrance_stays_on_top_mask() {
        let f = Fixture::new();
        let size = Size::new(100.0, 100.0);
        let below = f.overlay(size, OverlayConfig::default());
        let top = f.overlay(size, OverlayConfig::default());
        f.present(&below);

        f.host.attach(&top, f.window, PresentOptions::default()).unwrap();
        f.advance(100);

        let hit = f.host.hit_test(f.window, Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(hit, top);
        hit.handle_mask_tap(Vec2::new(5.0, 5.0));

        assert_eq!(top.phase(), Phase::Presenting);
        assert_eq!(below.phase(), Phase::Presented);
        f.settle();
        assert_eq!(f.host.overlays(f.window), vec![below.clone(), top.clone()]);
    }

    #[test]
    fn test_custom_default_dismiss() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(100.0, 100.0), OverlayConfig::default());
        let taps = Rc::new(Cell::new(0));
        let t = taps.clone();
        c.set_default_dismiss(move |_| t.set(t.get() + 1));
        f.present(&c);

        c.handle_mask_tap(Vec2::new(5.0, 5.0));
        assert_eq!(taps.get(), 1);
        assert_eq!(c.phase(), Phase::Presented);
    }

    fn tall_sheet(f: &Fixture, presentation: SlideStyle) -> OverlayController {
        f.overlay(
            Size::new(400.0, 600.0),
            OverlayConfig::default()
                .with_layout_position(LayoutPosition::Bottom)
                .with_presentation_style(presentation)
                .with_pan_gesture(true, 0.5),
        )
    }

    #[test]
    fn test_drag_past_threshold_dismisses() {
        let f = Fixture::new();
        let c = tall_sheet(&f, SlideStyle::Fade);
        f.present(&c);

        c.handle_pan(PanEvent::began());
        c.handle_pan(PanEvent::changed(0.0, 280.0));
        assert!(c.is_dragging());
        // Top edge now 0.4 * h above the bottom of the surface.
        assert_eq!(c.content_frame().y, 480.0);
        assert!((c.mask_alpha() - (1.0 - 280.0 / 600.0)).abs() < 1e-4);

        c.handle_pan(PanEvent::ended());
        assert_eq!(c.phase(), Phase::Dismissing);
        assert_eq!(c.config().dismissal_style, Some(SlideStyle::FromBottom));

        f.settle();
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.content_center(), Vec2::new(200.0, 1100.0));
    }

    #[test]
    fn test_drag_short_of_threshold_rolls_back() {
        let f = Fixture::new();
        let c = tall_sheet(&f, SlideStyle::FromBottom);
        f.present(&c);

        c.handle_pan(PanEvent::began());
        c.handle_pan(PanEvent::changed(0.0, 120.0));
        // Top edge now 0.6 * h above the bottom of the surface.
        assert_eq!(c.content_frame().y, 320.0);
        c.handle_pan(PanEvent::ended());
        assert_eq!(c.phase(), Phase::Presented);
        assert!(!c.is_dragging());

        f.advance(100);
        assert_eq!(c.content_center(), Vec2::new(200.0, 500.0));
        assert_eq!(c.mask_alpha(), 1.0);
        assert_eq!(c.config().dismissal_style, None);
    }

    #[test]
    fn test_drag_inert_when_disabled() {
        let f = Fixture::new();
        let c = tall_sheet(&f, SlideStyle::FromBottom);
        c.set_pan_gesture_enabled(false);
        f.present(&c);

        c.handle_pan(PanEvent::began());
        c.handle_pan(PanEvent::changed(0.0, 400.0));
        c.handle_pan(PanEvent::ended());
        assert_eq!(c.phase(), Phase::Presented);
        assert_eq!(c.content_center(), Vec2::new(200.0, 500.0));
    }

    fn keyboard_up() -> KeyboardNotification {
        KeyboardNotification::will_change_frame(
            Rect::new(0.0, 800.0, 400.0, 300.0),
            Rect::new(0.0, 500.0, 400.0, 300.0),
        )
    }

    fn keyboard_down() -> KeyboardNotification {
        KeyboardNotification::will_hide(
            Rect::new(0.0, 500.0, 400.0, 300.0),
            Rect::new(0.0, 800.0, 400.0, 300.0),
        )
    }

    #[test]
    fn test_drag_commit_on_right_edge_slides_out_right() {
        let f = Fixture::new();
        let c = f.overlay(
            Size::new(300.0, 800.0),
            OverlayConfig::default()
                .with_layout_position(LayoutPosition::Right)
                .with_pan_gesture(true, 0.5),
        );
        f.present(&c);
        assert_eq!(c.content_center(), Vec2::new(250.0, 400.0));

        c.handle_pan(PanEvent::began());
        c.handle_pan(PanEvent::changed(150.0, 40.0));
        // Left edge moved from 100 to 250 of the 300 available.
        assert_eq!(c.content_center(), Vec2::new(400.0, 400.0));
        assert!((c.mask_alpha() - 0.5).abs() < 1e-4);

        c.handle_pan(PanEvent::ended());
        assert_eq!(c.phase(), Phase::Dismissing);
        assert_eq!(c.config().dismissal_style, Some(SlideStyle::FromRight));

        f.settle();
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.content_center(), Vec2::new(550.0, 400.0));
    }

    #[test]
    fn test_keyboard_follow_raises_and_restores() {
        let f = Fixture::new();
        let c = f.overlay(
            Size::new(400.0, 200.0),
            sheet()
                .with_pan_gesture(true, 0.5)
                .with_keyboard_follow(KeyboardFollow::FOLLOW, 10.0),
        );
        f.present(&c);

        f.host.post_keyboard(&keyboard_up());
        assert!(c.is_keyboard_visible());
        f.advance(250);
        assert_eq!(c.content_center(), Vec2::new(200.0, 390.0));

        // Drags are inert while the keyboard is up.
        c.handle_pan(PanEvent::began());
        c.handle_pan(PanEvent::changed(0.0, 300.0));
        assert_eq!(c.content_center(), Vec2::new(200.0, 390.0));
        c.handle_pan(PanEvent::ended());

        f.host.post_keyboard(&keyboard_down());
        assert!(!c.is_keyboard_visible());
        f.advance(250);
        assert_eq!(c.content_center(), Vec2::new(200.0, 700.0));
    }

    #[test]
    fn test_keyboard_ignored_without_follow() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(400.0, 200.0), sheet());
        f.present(&c);
        assert_eq!(f.host.keyboard_notifier().subscriber_count(), 0);

        f.host.post_keyboard(&keyboard_up());
        f.settle();
        assert!(!c.is_keyboard_visible());
        assert_eq!(c.content_center(), Vec2::new(200.0, 700.0));

        c.set_keyboard_follow(KeyboardFollow::FOLLOW);
        assert_eq!(f.host.keyboard_notifier().subscriber_count(), 1);
        c.set_keyboard_follow(KeyboardFollow::empty());
        assert_eq!(f.host.keyboard_notifier().subscriber_count(), 0);
    }

    #[test]
    fn test_keyboard_synchronized_presentation() {
        let f = Fixture::new();
        let c = f.overlay(
            Size::new(400.0, 200.0),
            sheet().with_keyboard_follow(
                KeyboardFollow::FOLLOW | KeyboardFollow::FIRST_RESPONDER,
                0.0,
            ),
        );
        // Taking focus in will-present brings the keyboard up.
        let host = f.host.clone();
        c.on_will_present(move |_| host.post_keyboard(&keyboard_up()));

        f.host.attach(&c, f.window, PresentOptions::default()).unwrap();
        // No slide-in: content starts at rest.
        assert_eq!(c.content_center(), Vec2::new(200.0, 700.0));
        assert!(c.is_keyboard_visible());

        f.advance(250);
        assert_eq!(c.phase(), Phase::Presented);
        assert_eq!(c.content_center(), Vec2::new(200.0, 400.0));
    }

    #[test]
    fn test_auto_dismiss_after_delay() {
        let f = Fixture::new();
        let c = f.overlay(
            Size::new(200.0, 60.0),
            OverlayConfig::default().with_dismiss_after_delay(Duration::from_secs(1)),
        );
        let events = record(&c);
        f.host.attach(&c, f.window, PresentOptions::default()).unwrap();
        f.advance(250);
        assert_eq!(c.phase(), Phase::Presented);
        assert!(c.is_auto_dismiss_pending());

        f.advance(999);
        assert_eq!(c.phase(), Phase::Presented);

        f.advance(1);
        assert_eq!(c.phase(), Phase::Dismissing);
        f.advance(250);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(count(&events, "did_dismiss"), 1);
        assert!(!f.host.has_overlays(f.window));
    }

    #[test]
    fn test_explicit_dismiss_cancels_auto_dismiss() {
        let f = Fixture::new();
        let c = f.overlay(
            Size::new(200.0, 60.0),
            OverlayConfig::default().with_dismiss_after_delay(Duration::from_secs(1)),
        );
        let events = record(&c);
        f.host.attach(&c, f.window, PresentOptions::default()).unwrap();
        f.advance(250);
        f.advance(500);

        c.dismiss(DismissOptions::default());
        assert!(!c.is_auto_dismiss_pending());
        f.advance(250);
        assert_eq!(c.phase(), Phase::Idle);

        f.advance(2000);
        assert_eq!(count(&events, "will_dismiss"), 1);
        assert_eq!(count(&events, "did_dismiss"), 1);
    }

    #[test]
    fn test_detach_which() {
        let f = Fixture::new();
        let size = Size::new(100.0, 100.0);
        let a = f.overlay(size, OverlayConfig::default());
        let b = f.overlay(size, OverlayConfig::default());
        let c = f.overlay(size, OverlayConfig::default());
        for o in [&a, &b, &c] {
            f.present(o);
        }

        assert_eq!(
            f.host
                .detach_which(f.window, DismissWhich::Last, DismissOptions::default(), None),
            1
        );
        assert_eq!(c.phase(), Phase::Dismissing);
        f.settle();
        assert_eq!(f.host.overlays(f.window), vec![a.clone(), b.clone()]);

        let done = Rc::new(Cell::new(0));
        let d = done.clone();
        let started = f.host.detach_which(
            f.window,
            DismissWhich::All,
            DismissOptions::default(),
            Some(Box::new(move || d.set(d.get() + 1))),
        );
        assert_eq!(started, 2);
        f.settle();
        assert_eq!(done.get(), 1);
        assert!(!f.host.has_overlays(f.window));
        assert_eq!(
            f.host
                .detach_which(f.window, DismissWhich::First, DismissOptions::default(), None),
            0
        );
    }

    #[test]
    fn test_remove_surface_tears_down() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(100.0, 100.0), OverlayConfig::default());
        let events = record(&c);
        f.present(&c);

        assert!(f.host.remove_surface(f.window));
        assert_eq!(c.phase(), Phase::Idle);
        assert!(!c.is_attached());
        assert!(f.host.surface(f.window).is_none());
        assert_eq!(count(&events, "did_dismiss"), 0);
        assert_eq!(
            c.present(PresentOptions::default()),
            Err(OverlayError::SurfaceNotFound(f.window))
        );
    }

    #[test]
    fn test_surface_resize_relayouts() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(100.0, 100.0), OverlayConfig::default());
        f.present(&c);

        f.host
            .set_surface_frame(f.window, Rect::new(0.0, 0.0, 800.0, 400.0))
            .unwrap();
        assert_eq!(c.content_center(), Vec2::new(400.0, 200.0));
        assert_eq!(c.mask().unwrap().frame, Rect::new(0.0, 0.0, 800.0, 400.0));
        assert_eq!(
            f.host.surface(f.window).map(|s| s.frame),
            Some(Rect::new(0.0, 0.0, 800.0, 400.0))
        );
    }

    #[test]
    fn test_surface_resize_during_entrance_lands_on_new_rest() {
        let f = Fixture::new();
        let c = f.overlay(Size::new(400.0, 200.0), sheet());

        f.host.attach(&c, f.window, PresentOptions::default()).unwrap();
        f.advance(100);
        f.host
            .set_surface_frame(f.window, Rect::new(0.0, 0.0, 400.0, 600.0))
            .unwrap();
        assert_eq!(c.phase(), Phase::Presenting);

        f.advance(150);
        assert_eq!(c.phase(), Phase::Presented);
        assert_eq!(c.content_center(), Vec2::new(200.0, 500.0));
        assert_eq!(c.resting_center(), Some(Vec2::new(200.0, 500.0)));
    }

    #[test]
    fn test_config_from_json_preset() {
        let json = r#"{
            "layout_position": "bottom",
            "presentation_style": "from_bottom",
            "dismissal_style": { "scale": { "factor": 0.9 } },
            "mask_style": { "black": { "opacity": 0.3 } },
            "window_level": "high",
            "keyboard_follow": "FOLLOW | FIRST_RESPONDER"
        }"#;
        let config: OverlayConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.layout_position, LayoutPosition::Bottom);
        assert_eq!(config.presentation_style, SlideStyle::FromBottom);
        assert_eq!(
            config.effective_dismissal_style(),
            SlideStyle::Scale { factor: 0.9 }
        );
        assert_eq!(config.mask_style, MaskStyle::Black { opacity: 0.3 });
        assert_eq!(config.window_level, WindowLevel::High);
        assert!(config.keyboard_follow.is_synchronized());
        // Unspecified fields keep their defaults.
        assert!(config.dismiss_on_mask_touched);
        assert_eq!(config.pan_dismiss_ratio, 0.5);
        assert_eq!(config.dismiss_after_delay, Duration::ZERO);
    }
}

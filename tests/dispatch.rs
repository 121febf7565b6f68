use kbd_leds::hardware::ps2::commands::{RESEND, SET_LEDS};
use kbd_leds::request::{LED_IOC_GET_STATE, LED_IOC_SET_STATE};
use kbd_leds::sim::{NoDelay, SimController, SimIrq};
use kbd_leds::{
    ControlError, ControlRequest, Controller, DecodeError, DriverConfig, LedDevice, LedIndex,
    LedState, Response,
};
use pc_keyboard::KeyCode;

fn controller(sim: &SimController) -> Controller<SimController, SimIrq, NoDelay> {
    Controller::new(sim.clone(), SimIrq::new(), NoDelay, DriverConfig::DEFAULT.with_poll_limit(128))
}

#[test]
fn set_then_get_round_trips_every_led() {
    for led in LedIndex::ALL {
        for state in [true, false] {
            let ctl = controller(&SimController::acking());
            ctl.store().replace(LedState::new(false, true, false));
            let before = ctl.state();

            assert_eq!(ctl.handle(ControlRequest::Set { led, state }), Ok(Response::Updated));
            assert_eq!(ctl.handle(ControlRequest::Get { led }), Ok(Response::State(state)));
            for other in LedIndex::ALL.into_iter().filter(|o| *o != led) {
                assert_eq!(ctl.get(other), before.get(other));
            }
        }
    }
}

#[test]
fn get_never_touches_hardware() {
    let sim = SimController::busy();
    let ctl = controller(&sim);

    assert_eq!(ctl.handle(ControlRequest::Get { led: LedIndex::CapsLock }), Ok(Response::State(false)));
    assert!(sim.written().is_empty());
}

#[test]
fn set_all_replaces_every_indicator() {
    let sim = SimController::acking();
    let ctl = controller(&sim);
    let state = LedState::new(true, false, true);

    assert_eq!(ctl.handle(ControlRequest::SetAll { state }), Ok(Response::Updated));
    assert_eq!(ctl.state(), state);
    assert_eq!(sim.pushed_words(), [0b101]);
}

#[test]
fn ioctl_set_and_get() {
    let sim = SimController::acking();
    let ctl = controller(&sim);
    let dev = LedDevice::new(&ctl);

    assert_eq!(dev.ioctl(LED_IOC_SET_STATE, 21), Ok(0));
    assert_eq!(dev.ioctl(LED_IOC_GET_STATE, 2), Ok(1));
    assert_eq!(dev.ioctl(LED_IOC_GET_STATE, 1), Ok(0));
    assert_eq!(sim.written(), [SET_LEDS, 0b100]);
}

#[test]
fn ioctl_reports_decode_and_handshake_errors() {
    let sim = SimController::scripted(&[RESEND]);
    let ctl = controller(&sim);
    let dev = LedDevice::new(&ctl);

    assert_eq!(
        dev.ioctl(LED_IOC_GET_STATE, 5),
        Err(ControlError::Decode(DecodeError::LedOutOfRange(5)))
    );
    assert!(sim.written().is_empty());

    assert!(matches!(dev.ioctl(LED_IOC_SET_STATE, 1), Err(ControlError::Handshake(_))));
    assert_eq!(dev.ioctl(LED_IOC_GET_STATE, 0), Ok(1));
}

#[test]
fn device_write_takes_caps_num_scroll_text() {
    let sim = SimController::acking();
    let ctl = controller(&sim);
    let dev = LedDevice::new(&ctl);

    assert_eq!(dev.write(b"110"), Ok(3));
    assert_eq!(ctl.state(), LedState::new(false, true, true));
    assert_eq!(sim.pushed_words(), [0b110]);

    assert!(matches!(dev.write(b"12"), Err(ControlError::Parse(_))));
    assert!(matches!(dev.write(&[0xFF, b'0', b'0']), Err(ControlError::Parse(_))));
    assert_eq!(sim.pushed_words(), [0b110]);
}

#[test]
fn lock_key_flips_its_indicator() {
    let ctl = controller(&SimController::acking());
    ctl.set(LedIndex::NumLock, true).unwrap();

    assert_eq!(
        ctl.lock_key_request(KeyCode::NumpadLock),
        Some(ControlRequest::Set { led: LedIndex::NumLock, state: false })
    );
    assert_eq!(
        ctl.lock_key_request(KeyCode::CapsLock),
        Some(ControlRequest::Set { led: LedIndex::CapsLock, state: true })
    );
    assert_eq!(ctl.lock_key_request(KeyCode::Spacebar), None);
}

pub mod runner;

pub use runner::ShowRunner;

/// Seed for a show's random streams, drawn from the browser.
pub fn entropy_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}

/// Generate all `#[wasm_bindgen]` exports for a show.
///
/// Expands to:
/// - `thread_local!` storage for the ShowRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (show_init, show_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use reel_engine::*;
///
/// mod show;
/// use show::MyShow;
///
/// reel_web::export_show!(MyShow, "my-show");
/// ```
///
/// The show type must provide `fn new(seed: u64) -> Self`.
#[macro_export]
macro_rules! export_show {
    ($show_type:ty, $show_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::ShowRunner<$show_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::ShowRunner<$show_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Show not initialized. Call show_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn show_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let show = <$show_type>::new($crate::entropy_seed());
            let runner = $crate::ShowRunner::new(show);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $show_name);
        }

        #[wasm_bindgen]
        pub fn show_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn show_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn show_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn show_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn show_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn show_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn show_swipe(dx: f32) {
            with_runner(|r| r.push_input(InputEvent::Swipe { dx }));
        }

        #[wasm_bindgen]
        pub fn show_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_buffer_ptr() -> *const f32 {
            with_runner(|r| r.buffer_ptr())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }

        #[wasm_bindgen]
        pub fn get_event_count() -> u32 {
            with_runner(|r| r.event_count())
        }

        #[wasm_bindgen]
        pub fn get_haptic_count() -> u32 {
            with_runner(|r| r.haptic_count())
        }

        #[wasm_bindgen]
        pub fn get_view_json() -> String {
            with_runner(|r| r.view_json().to_owned())
        }

        #[wasm_bindgen]
        pub fn get_view_revision() -> u32 {
            with_runner(|r| r.view_revision())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_max_haptics() -> u32 {
            with_runner(|r| r.max_haptics())
        }
    };
}

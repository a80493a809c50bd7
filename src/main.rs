//! Koi Pond entry point
//!
//! On the web: wires the canvas, window resize, clicks, the music button and
//! the countdown label to the frame driver. Natively: runs the pond headless
//! for a few seconds and logs what happened.

#[cfg(target_arch = "wasm32")]
mod wasm_pond {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlAudioElement, HtmlCanvasElement, MouseEvent};

    use koi_pond::audio::MusicControl;
    use koi_pond::audio::web::ElementMusic;
    use koi_pond::driver::{FrameDriver, Scene, SetupError};
    use koi_pond::renderer::{RenderState, scene::clear_color};
    use koi_pond::{Countdown, Settings};

    /// Everything the page callbacks share
    struct App {
        driver: FrameDriver<RenderState>,
        canvas: HtmlCanvasElement,
        countdown: Countdown,
        music: Option<MusicControl<ElementMusic>>,
        raf_id: Option<i32>,
        countdown_interval: Option<i32>,
        resize_listener: Option<Closure<dyn FnMut(web_sys::Event)>>,
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    fn viewport_size(window: &web_sys::Window) -> (u32, u32) {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (
            dim(window.inner_width()).max(1.0) as u32,
            dim(window.inner_height()).max(1.0) as u32,
        )
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    pub async fn run() -> Result<(), SetupError> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Koi pond starting...");

        let window = web_sys::window().ok_or(SetupError::NoWindow)?;
        let document = window.document().ok_or(SetupError::NoWindow)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or(SetupError::NoCanvas)?;

        let (width, height) = viewport_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        settings.save();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        log::info!("Pond seed: {seed}");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| SetupError::Surface(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| SetupError::NoAdapter)?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, clear_color()).await?;
        let scene = Scene::new(&settings, Vec2::new(width as f32, height as f32), seed);
        let Some(driver) = FrameDriver::start(scene, Some(render_state)) else {
            return Ok(());
        };

        let music = document
            .get_element_by_id("music")
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
            .map(|el| MusicControl::new(ElementMusic::new(el), settings.music_volume));
        if music.is_none() {
            log::info!("No <audio id=\"music\"> element; music toggle disabled");
        }

        let app = Rc::new(RefCell::new(App {
            driver,
            canvas: canvas.clone(),
            countdown: Countdown::new(settings.countdown_secs),
            music,
            raf_id: None,
            countdown_interval: None,
            resize_listener: None,
        }));
        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

        setup_resize(&window, app.clone());
        setup_click(&canvas, app.clone());
        setup_music(app.clone());
        setup_countdown(&window, app.clone());

        request_animation_frame(app);

        log::info!("Koi pond running!");
        Ok(())
    }

    fn setup_resize(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let shared = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (w, h) = viewport_size(&window);
            let mut a = shared.borrow_mut();
            a.canvas.set_width(w);
            a.canvas.set_height(h);
            a.driver.resize(w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        app.borrow_mut().resize_listener = Some(closure);
    }

    fn setup_click(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = canvas_clone.get_bounding_client_rect();
            let pos = Vec2::new(
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            );
            app.borrow_mut().driver.click(pos, now_ms());
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn update_music_label(app: &App) {
        if let Some(music) = &app.music {
            set_text("music-toggle", music.label());
        }
    }

    fn setup_music(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        update_music_label(&app.borrow());

        if let Some(btn) = document.get_element_by_id("music-toggle") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let pending = {
                    let mut a = app.borrow_mut();
                    let Some(music) = a.music.as_mut() else {
                        log::warn!("Music toggle pressed but there is no audio element");
                        return;
                    };
                    music.toggle();
                    let pending = music.backend_mut().take_pending();
                    update_music_label(&a);
                    pending
                };
                // play() resolves later; a rejection flips the button back
                if let Some(promise) = pending {
                    let app = app.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(e) = JsFuture::from(promise).await {
                            let mut a = app.borrow_mut();
                            if let Some(music) = a.music.as_mut() {
                                music.playback_failed(&format!("{e:?}"));
                            }
                            update_music_label(&a);
                        }
                    });
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let element = app
            .borrow_mut()
            .music
            .as_mut()
            .map(|m| m.backend_mut().element().clone());
        if let Some(element) = element {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                if let Some(music) = a.music.as_mut() {
                    music.ended();
                }
                update_music_label(&a);
            });
            let _ = element
                .add_event_listener_with_callback("ended", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_countdown(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        set_text("timer", &app.borrow().countdown.label());
        if app.borrow().countdown.is_finished() {
            return;
        }

        let shared = app.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut a = shared.borrow_mut();
            a.countdown.tick_second();
            set_text("timer", &a.countdown.label());
            if a.countdown.is_finished() {
                if let (Some(id), Some(window)) = (a.countdown_interval.take(), web_sys::window()) {
                    window.clear_interval_with_handle(id);
                }
            }
        });
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1000,
        ) {
            Ok(id) => app.borrow_mut().countdown_interval = Some(id),
            Err(e) => log::warn!("Countdown not started: {e:?}"),
        }
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = app.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(next, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => app.borrow_mut().raf_id = Some(id),
            Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        let running = {
            let mut a = app.borrow_mut();
            a.raf_id = None;
            a.driver.frame(time)
        };
        if running {
            request_animation_frame(app);
        }
    }

    /// Stop the pond: cancel the pending frame, detach listeners, drop deferred work
    #[wasm_bindgen]
    pub fn teardown() {
        let Some(app) = APP.with(|slot| slot.borrow_mut().take()) else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut a = app.borrow_mut();
        a.driver.teardown();
        if let Some(id) = a.raf_id.take() {
            let _ = window.cancel_animation_frame(id);
        }
        if let Some(id) = a.countdown_interval.take() {
            window.clear_interval_with_handle(id);
        }
        if let Some(listener) = a.resize_listener.take() {
            let _ = window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
        }
        if let Some(music) = a.music.as_mut() {
            if music.state() == koi_pond::audio::MusicState::Playing {
                music.toggle();
            }
        }
        log::info!("Koi pond stopped after {} frames", a.driver.frames());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_pond::run().await {
        log::warn!("Koi pond not started: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use koi_pond::audio::{MusicControl, SilentMusic};
    use koi_pond::driver::{FixedRateTicks, HeadlessSurface};
    use koi_pond::{Countdown, FrameDriver, Scene, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Koi pond (native, headless) starting...");

    let path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let settings = Settings::load_from(path.as_deref());
    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("Pond seed: {seed}, quality {}", settings.quality.as_str());

    let (width, height) = (1280, 720);
    let scene = Scene::new(&settings, Vec2::new(width as f32, height as f32), seed);
    let surface = HeadlessSurface::new(width, height);
    let Some(mut driver) = FrameDriver::start(scene, Some(surface)) else {
        return;
    };
    let mut countdown = Countdown::new(settings.countdown_secs);

    // No audio device here; the toggle still goes through the no-source path
    let mut music = MusicControl::new(SilentMusic::default(), settings.music_volume);
    let state = music.toggle();
    log::info!("Music: {state:?} ({})", music.label());

    // Three seconds at 60 Hz, with a splash and a lily pad click along the way
    let frame_ms = 1000.0 / 60.0;
    let mut clock = 0.0;
    for second in 0..3 {
        if second == 1 {
            let outcome = driver.click(Vec2::new(width as f32 * 0.5, height as f32 * 0.9), clock);
            log::info!("Water click: {outcome:?}");
        }
        if second == 2 {
            if let Some((center, _)) = driver.scene().state().lily_pad_bounds(1) {
                let outcome = driver.click(center, clock);
                log::info!("Lily click: {outcome:?}");
            }
        }
        driver.run(&mut FixedRateTicks::new(clock, frame_ms, 60));
        clock += 60.0 * frame_ms;
        countdown.tick_second();
        log::info!(
            "{} left, {} ripples, {} deferred",
            countdown.label(),
            driver.scene().state().ripples.len(),
            driver.scene().pending_tasks()
        );
    }

    let vertices = driver
        .surface()
        .last_frame()
        .map(|f| f.vertices.len())
        .unwrap_or(0);
    driver.teardown();
    log::info!(
        "Ran {} frames; last frame had {vertices} vertices",
        driver.frames()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is wasm_main
}

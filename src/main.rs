// What you SEE now:
// • The source image (or a built-in test card) fitted onto the canvas.
// • P toggles picking mode: a magnifier with a pixelated grid follows the
//   mouse, the center cell is outlined, and its hex value is shown below.
// • Left click on the canvas commits that color to the HUD. ESC quits.

mod canvas;
mod draw;
mod error;
mod magnifier;
mod picker;
mod sampler;
mod types;

use canvas::Canvas;
use draw::Drawer;
use error::Error;
use magnifier::Magnifier;
use picker::PickerSession;
use sampler::MagnifierConfig;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use types::{FrameBuffer, Rect};

const WIN_W: usize = 640;
const WIN_H: usize = 480;
// Canvas area inside the window; fixed for the whole session.
const CANVAS_BOUNDS: Rect = Rect { x: 20, y: 40, width: 600, height: 420 };

const BACKGROUND: u32 = 0x00202020;
const HUD_COLOR: u32 = 0x00FFFFFF;
const CROSSHAIR_COLOR: u32 = 0x00FFCC33;

/// "#RRGGBB" back to a packed pixel, for the swatch and magnifier frame.
fn hex_to_px(hex: &str) -> u32 {
    u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or(0x00FFFFFF)
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    /* --- Window + canvas setup ---
       Visual: window opens showing the fitted source image. */
    let mut drawer = Drawer::new("Color Dropper — P: pick, ESC: quit", WIN_W, WIN_H)?;
    let mut canvas = Canvas::new(CANVAS_BOUNDS);
    match std::env::args().nth(1) {
        Some(path) => canvas.load_image(&path)?,
        None => {
            warn!("no image path given, showing the built-in test card");
            canvas.install(canvas::test_card(
                CANVAS_BOUNDS.width as usize,
                CANVAS_BOUNDS.height as usize,
            ));
        }
    }

    /* --- Magnifier engine ---
       Bad geometry fails loudly here, before the first tick. */
    let mut magnifier = Magnifier::new(MagnifierConfig::default())?;
    let mut session = PickerSession::new();
    let mut selected = String::from("#FFFFFF");

    /* --- Reusable screen buffer ---
       Visual: this is the image you actually see each frame. */
    let mut screen = FrameBuffer::new(WIN_W, WIN_H);
    info!("ready");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Inputs. The click edge is polled exactly once per frame. */
        if drawer.p_pressed_once() {
            session.toggle();
        }
        let mut clicked = drawer.left_clicked();
        let mouse = drawer.mouse_pos();

        /* 2) Background + canvas image. */
        screen.pixels.fill(BACKGROUND);
        if let Some(surface) = canvas.surface() {
            draw::blit(&mut screen, surface, CANVAS_BOUNDS.x, CANVAS_BOUNDS.y);
        }

        /* 3) Picking tick: Sampler → grid render → color, strictly in order,
              only while the mode is on and the surface is ready. */
        if session.is_active() {
            if let (Some(surface), Some((mx, my))) = (canvas.surface(), mouse) {
                if let Some(focus) = canvas.focus_at(mx, my) {
                    let color = magnifier.tick(surface, focus);
                    session.set_current(color);

                    /* 4) Commit? A hit consumes the click so nothing else can
                          react to it this frame. */
                    if clicked {
                        if let Some(color) = session.try_commit(mx, my, &canvas.bounds()) {
                            selected = color;
                            clicked = false;
                            info!(color = %selected, "color selected");
                        }
                    }

                    /* 5) Magnifier overlay beside the cursor, framed in the
                          live color, hex label underneath, crosshair on top. */
                    if session.is_active() {
                        let view = magnifier.view();
                        let vs = view.width as i32;
                        let mut bx = mx + 16;
                        let mut by = my + 16;
                        if bx + vs + 4 > WIN_W as i32 {
                            bx = mx - 16 - vs;
                        }
                        if by + vs + 16 > WIN_H as i32 {
                            by = my - 16 - vs;
                        }
                        let frame_px = hex_to_px(session.current());
                        draw::draw_rect_outline(&mut screen, bx - 3, by - 3, vs + 6, vs + 6, 3, frame_px);
                        draw::blit_keyed(&mut screen, view, bx, by);
                        let label = session.current();
                        let label_w = label.chars().count() as i32 * 6;
                        draw::draw_text_5x7(&mut screen, bx + (vs - label_w) / 2, by + vs + 6, label, HUD_COLOR);
                        draw::draw_crosshair(&mut screen, mx, my, 12, CROSSHAIR_COLOR);
                    }
                }
            } else {
                debug!("tick skipped: surface not ready");
            }
        }
        let _ = clicked; // an unconsumed click has no other listener

        /* 6) HUD: mode + selected color, with a swatch of the selection. */
        let hud = if session.is_active() {
            format!("PICK: {}", session.current())
        } else {
            format!("PICKED: {selected} | P: PICK")
        };
        draw::draw_text_5x7(&mut screen, 8, 8, &hud, HUD_COLOR);
        draw::fill_rect(&mut screen, WIN_W as i32 - 44, 4, 36, 16, hex_to_px(&selected));
        draw::draw_rect_outline(&mut screen, WIN_W as i32 - 45, 3, 38, 18, 1, HUD_COLOR);

        /* 7) Present to the window. */
        drawer.present(&screen)?;
    }

    Ok(())
}

//! Continuous apple motion
//!
//! Drifting apples update on every render callback with raw elapsed
//! time, independent of the snake's tick rate. Motion is cosmetic: the
//! rules engine only ever sees the cell an apple currently rounds to.

use super::grid::Grid;
use super::state::{FoodItem, Snake};

/// Speed a drifting apple is launched at, in cells per second
pub const FOOD_SPEED: f32 = 2.5;
/// Steering acceleration toward the snake's head, in cells per second squared
pub const ATTRACT_ACCEL: f32 = 6.0;
/// Ceiling on drift speed, so attraction cannot wind apples up forever
pub const FOOD_MAX_SPEED: f32 = 4.0;

/// Advance every drifting apple by `dt` seconds
///
/// Apples reflect off the grid edges and off the snake's body; with
/// `attract` set they steer toward the head. Body contact reverts the
/// apple to its pre-step position and reverses its velocity, which
/// keeps every apple in bounds and off the snake without gaining
/// energy.
pub fn drift_food(snake: &Snake, food: &mut [FoodItem], grid: Grid, attract: bool, dt: f32) {
    let head = snake.head();
    let max = (grid.dimension() - 1) as f32;

    for item in food.iter_mut() {
        if !item.is_drifting() {
            continue;
        }

        if attract {
            steer_toward(item, head.x as f32, head.y as f32, dt);
        }

        let (px, py) = (item.x, item.y);
        item.x += item.vx * dt;
        item.y += item.vy * dt;

        if item.x < 0.0 {
            item.x = 0.0;
            item.vx = item.vx.abs();
        } else if item.x > max {
            item.x = max;
            item.vx = -item.vx.abs();
        }
        if item.y < 0.0 {
            item.y = 0.0;
            item.vy = item.vy.abs();
        } else if item.y > max {
            item.y = max;
            item.vy = -item.vy.abs();
        }

        if snake.occupies(item.cell()) {
            item.x = px;
            item.y = py;
            item.vx = -item.vx;
            item.vy = -item.vy;
        }
    }
}

fn steer_toward(item: &mut FoodItem, tx: f32, ty: f32, dt: f32) {
    let (dx, dy) = (tx - item.x, ty - item.y);
    let distance = (dx * dx + dy * dy).sqrt();
    if distance < f32::EPSILON {
        return;
    }

    item.vx += dx / distance * ATTRACT_ACCEL * dt;
    item.vy += dy / distance * ATTRACT_ACCEL * dt;

    let speed = (item.vx * item.vx + item.vy * item.vy).sqrt();
    if speed > FOOD_MAX_SPEED {
        let scale = FOOD_MAX_SPEED / speed;
        item.vx *= scale;
        item.vy *= scale;
    }
}

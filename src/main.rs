use anyhow::Result;
use glam::Vec3;
use log::info;
use winit::keyboard::KeyCode;

mod core;
mod engine;
mod game;

use crate::core::color::Color;
use crate::core::math::move_towards_vec3;
use engine::app::{Application, Context};
use engine::core::CoreEngine;
use engine::objects::{GameObject, GameObjectHandle};
use engine::physics::Aabb;
use game::Player;

/// Walkable demo scene: a floor, a few platforms, and a patrolling beacon
struct Sandbox {
    player: Option<Player>,
    beacon: Option<GameObjectHandle>,
    beacon_target: Vec3,
    paused: bool,
}

impl Sandbox {
    const BEACON_WAYPOINT_A: Vec3 = Vec3::new(-6.0, 2.5, -6.0);
    const BEACON_WAYPOINT_B: Vec3 = Vec3::new(6.0, 2.5, -6.0);
    const BEACON_SPEED: f32 = 3.0;

    fn new() -> Self {
        Self {
            player: None,
            beacon: None,
            beacon_target: Self::BEACON_WAYPOINT_B,
            paused: false,
        }
    }

    /// Spawn a solid cuboid: one renderable object plus a matching static
    /// collision volume
    fn spawn_block(ctx: &mut Context, center: Vec3, size: Vec3, color: Color) {
        ctx.objects.spawn(GameObject::with_color(center, size, color));
        ctx.physics.add_static(Aabb::new(center, size * 0.5));
    }
}

impl Application for Sandbox {
    fn init(&mut self, ctx: &mut Context) {
        ctx.display.capture_cursor(true);
        ctx.camera.set_following_mouse(true);

        // Floor slab with its top surface at y = 0
        Self::spawn_block(
            ctx,
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 1.0, 20.0),
            Color::rgb(0.35, 0.4, 0.35),
        );

        // A few platforms to jump between
        Self::spawn_block(
            ctx,
            Vec3::new(3.0, 0.4, -4.0),
            Vec3::new(2.0, 0.8, 2.0),
            Color::rgb(0.6, 0.45, 0.3),
        );
        Self::spawn_block(
            ctx,
            Vec3::new(5.5, 1.0, -6.5),
            Vec3::new(2.0, 2.0, 2.0),
            Color::rgb(0.6, 0.45, 0.3),
        );
        Self::spawn_block(
            ctx,
            Vec3::new(-4.0, 0.75, -3.0),
            Vec3::new(1.5, 1.5, 1.5),
            Color::RED,
        );

        // Wall along the -z edge
        Self::spawn_block(
            ctx,
            Vec3::new(0.0, 1.5, -10.0),
            Vec3::new(20.0, 3.0, 0.5),
            Color::rgb(0.45, 0.45, 0.5),
        );

        // Floating beacon that patrols above the scene
        let mut beacon = GameObject::with_color(
            Self::BEACON_WAYPOINT_A,
            Vec3::splat(0.5),
            Color::rgb(1.0, 0.9, 0.2),
        );
        beacon.rotation = glam::Quat::from_rotation_y(0.7);
        self.beacon = Some(ctx.objects.spawn(beacon));

        self.player = Some(Player::new(ctx.physics, Vec3::new(0.0, 2.0, 3.0)));

        info!("Sandbox ready: WASD to move, Space to jump, P pause, V vsync, M MSAA, Esc to quit");
    }

    fn tick(&mut self, ctx: &mut Context, delta: f32) {
        if ctx.keys.just_pressed(KeyCode::Escape) {
            ctx.request_exit();
            return;
        }
        if ctx.keys.just_pressed(KeyCode::KeyV) {
            let vsync = !ctx.render_settings.vsync();
            ctx.render_settings.set_vsync(vsync);
            info!("Vsync: {}", vsync);
        }
        if ctx.keys.just_pressed(KeyCode::KeyP) {
            self.paused = !self.paused;
            // Release the cursor so the window is usable while paused
            ctx.display.capture_cursor(!self.paused);
            ctx.camera.set_following_mouse(!self.paused);
            info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        if self.paused {
            return;
        }
        if ctx.keys.just_pressed(KeyCode::KeyM) {
            let samples = if ctx.render_settings.msaa_samples() == 4 { 1 } else { 4 };
            ctx.render_settings.set_msaa_samples(samples);
            info!("MSAA samples: {}", samples);
        }

        if let Some(player) = &mut self.player {
            player.tick(ctx.keys, ctx.camera, ctx.physics);
        }

        if let Some(handle) = self.beacon {
            if let Some(beacon) = ctx.objects.get_mut(handle) {
                beacon.position =
                    move_towards_vec3(beacon.position, self.beacon_target, Self::BEACON_SPEED * delta);
                if beacon.position == self.beacon_target {
                    self.beacon_target = if self.beacon_target == Self::BEACON_WAYPOINT_A {
                        Self::BEACON_WAYPOINT_B
                    } else {
                        Self::BEACON_WAYPOINT_A
                    };
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Citrine sandbox...");

    CoreEngine::new("Citrine Sandbox", 1280, 720)
        .background_color(Color::SKY)
        .log_fps(true)
        .run(Sandbox::new())
}

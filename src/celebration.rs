use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

const CONFETTI: [char; 6] = ['*', '+', '•', '✦', '✧', '·'];
const HEADLINES: [&str; 4] = ["YOU GOT IT!", "NAILED IT!", "SPOT ON!", "THAT'S THEM!"];
const STEP_SECS: f64 = 0.1;
const GRAVITY: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// letters fly to a fixed spot and stay; confetti falls
    pub target: Option<(f64, f64)>,
}

impl Particle {
    fn confetti(x: f64, y: f64, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *CONFETTI.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
            target: None,
        }
    }

    fn letter(x: f64, y: f64, target: (f64, f64), symbol: char, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            vel_x: target.0 - x,
            vel_y: target.1 - y,
            symbol,
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(3.0..4.0),
            target: Some(target),
        }
    }

    pub fn is_letter(&self) -> bool {
        self.target.is_some()
    }

    fn update(&mut self, dt: f64) -> bool {
        match self.target {
            Some((tx, ty)) => {
                if (tx - self.x).hypot(ty - self.y) > 1.0 {
                    self.x += self.vel_x * dt;
                    self.y += self.vel_y * dt;
                    self.vel_x *= 0.95;
                    self.vel_y *= 0.95;
                } else {
                    self.x = tx;
                    self.y = ty;
                }
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += GRAVITY * dt;
            }
        }
        self.age += dt;
        self.age < self.max_age
    }
}

/// Short confetti burst shown after a correct guess
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub is_active: bool,
    elapsed: f64,
    duration: f64,
    height: f64,
}

impl Default for Celebration {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            is_active: false,
            elapsed: 0.0,
            duration: Duration::from_secs(3).as_secs_f64(),
            height: 24.0,
        }
    }
}

impl Celebration {
    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();
        let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);

        self.particles.clear();
        self.elapsed = 0.0;
        self.height = height as f64;
        self.is_active = true;

        let headline = HEADLINES.choose(&mut rng).unwrap_or(&HEADLINES[0]);
        let left = cx - headline.chars().count() as f64;
        for (i, ch) in headline.chars().enumerate().filter(|(_, c)| *c != ' ') {
            let target = (left + i as f64 * 2.0, cy - 2.0);
            let start = (cx + rng.gen_range(-10.0..10.0), cy + rng.gen_range(-5.0..5.0));
            self.particles
                .push(Particle::letter(start.0, start.1, target, ch, &mut rng));
        }

        for _ in 0..25 {
            let x = cx + rng.gen_range(-15.0..15.0);
            let y = cy + rng.gen_range(-8.0..8.0);
            self.particles.push(Particle::confetti(x, y, &mut rng));
        }
    }

    /// Advance one tick
    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }
        self.elapsed += STEP_SECS;
        if self.elapsed >= self.duration {
            self.stop();
            return;
        }
        let floor = self.height + 5.0;
        self.particles
            .retain_mut(|p| p.update(STEP_SECS) && (p.is_letter() || p.y <= floor));
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }
}

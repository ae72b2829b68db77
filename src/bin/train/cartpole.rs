//! Classic cart-pole balancing task.

use deepq::env::{Environment, Step};
use deepq::{DqnError, Result};
use ndarray::{array, Array1};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;

pub struct CartPole {
    x: f32,          // cart position
    x_dot: f32,      // cart velocity
    theta: f32,      // pole angle (radians)
    theta_dot: f32,  // pole angular velocity

    gravity: f32,
    mass_cart: f32,
    mass_pole: f32,
    length: f32,
    force_mag: f32,
    dt: f32,

    rng: StdRng,
}

impl CartPole {
    pub fn new(seed: u64) -> Self {
        CartPole {
            x: 0.0,
            x_dot: 0.0,
            theta: 0.0,
            theta_dot: 0.0,
            gravity: 9.8,
            mass_cart: 1.0,
            mass_pole: 0.1,
            length: 0.5,
            force_mag: 10.0,
            dt: 0.02,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn observation(&self) -> Array1<f32> {
        array![self.x, self.x_dot, self.theta, self.theta_dot]
    }
}

impl Environment for CartPole {
    fn state_size(&self) -> usize {
        4
    }

    fn action_count(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.x = self.rng.gen_range(-0.05..0.05);
        self.x_dot = self.rng.gen_range(-0.05..0.05);
        self.theta = self.rng.gen_range(-0.05..0.05);
        self.theta_dot = self.rng.gen_range(-0.05..0.05);
        Ok(self.observation())
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        let force = match action {
            0 => -self.force_mag,
            1 => self.force_mag,
            _ => return Err(DqnError::InvalidAction { action, max_actions: 2 }),
        };

        let cos_theta = self.theta.cos();
        let sin_theta = self.theta.sin();
        let total_mass = self.mass_cart + self.mass_pole;
        let pole_mass_length = self.mass_pole * self.length;

        let temp = (force + pole_mass_length * self.theta_dot * self.theta_dot * sin_theta) / total_mass;
        let theta_acc = (self.gravity * sin_theta - cos_theta * temp)
            / (self.length * (4.0 / 3.0 - self.mass_pole * cos_theta * cos_theta / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;

        self.x += self.dt * self.x_dot;
        self.x_dot += self.dt * x_acc;
        self.theta += self.dt * self.theta_dot;
        self.theta_dot += self.dt * theta_acc;

        let done = self.x.abs() > 2.4 || self.theta.abs() > PI / 15.0;
        let reward = if done { 0.0 } else { 1.0 };

        Ok(Step { next_state: self.observation(), reward, done })
    }
}

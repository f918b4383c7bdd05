//! The reconciliation loop between the mood server and the bound light.
//!
//! Every cycle re-reads the server's intent and derives what to do from it and
//! from whether a light is currently bound. Nothing else is remembered between
//! cycles, so a missed or reordered update is corrected on the next poll.

use std::net::Ipv4Addr;
use std::time::Duration;

use log::{debug, info, warn};

use crate::device::Device;
use crate::discovery::Discovery;
use crate::effect::SearchEffect;
use crate::errors::Error;
use crate::remote::{Endpoint, RemoteState};
use crate::types::{LightParameters, Mode, PowerIntent};

type Result<T> = std::result::Result<T, Error>;

/// The light currently under control.
#[derive(Debug)]
pub struct Binding<D> {
    device: D,
    address: Ipv4Addr,
}

impl<D: Device> Binding<D> {
    fn new(device: D) -> Self {
        let address = device.address();
        Binding { device, address }
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }
}

/// What a successful cycle did.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The server is waiting and no light is bound.
    Idle,
    /// The server stopped searching; the bound light was released.
    ///
    /// `light_off` is `None` when no power-off was requested, otherwise the
    /// result of the best-effort power-off.
    Released {
        address: Ipv4Addr,
        light_off: Option<Result<()>>,
    },
    /// Discovery found no light.
    NothingFound,
    /// A light was discovered and bound; `effect` is the search effect's result.
    Bound {
        address: Ipv4Addr,
        effect: Result<()>,
    },
    /// The bound light was switched off.
    SwitchedOff,
    /// The bound light was switched on with these parameters.
    SwitchedOn(LightParameters),
}

/// Keeps one light in the state published by the mood server.
pub struct Bridge<R, D: Discovery> {
    remote: R,
    discovery: D,
    effect: SearchEffect,
    binding: Option<Binding<D::Device>>,
    poll_interval: Duration,
    error_backoff: Duration,
}

impl<R: RemoteState, D: Discovery> Bridge<R, D> {
    const POLL_INTERVAL_MS: u64 = 1000;
    const ERROR_BACKOFF_MS: u64 = 5000;

    pub fn new(remote: R, discovery: D) -> Self {
        Bridge {
            remote,
            discovery,
            effect: SearchEffect::default(),
            binding: None,
            poll_interval: Duration::from_millis(Self::POLL_INTERVAL_MS),
            error_backoff: Duration::from_millis(Self::ERROR_BACKOFF_MS),
        }
    }

    /// Delay between the end of one cycle and the start of the next.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Delay used instead of the poll interval when the server answers the
    /// search status request with an error status.
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    pub fn binding(&self) -> Option<&Binding<D::Device>> {
        self.binding.as_ref()
    }

    /// Polls forever. Each cycle's result is logged, never propagated.
    pub async fn run(&mut self) {
        loop {
            let delay = self.step().await;
            tokio::time::sleep(delay).await;
        }
    }

    /// Runs one cycle, logs its result and returns how long to wait before the next.
    async fn step(&mut self) -> Duration {
        match self.cycle().await {
            Ok(outcome) => {
                log_outcome(&outcome);
                self.poll_interval
            }
            Err(e @ Error::Status {
                endpoint: Endpoint::SearchStatus,
                ..
            }) => {
                warn!("search status unavailable, backing off: {}", e);
                self.error_backoff
            }
            Err(e) => {
                warn!("cycle failed: {}", e);
                self.poll_interval
            }
        }
    }

    /// Runs a single reconciliation cycle.
    ///
    /// A failed fetch leaves the binding untouched. A failed device command
    /// never clears the binding; only the server switching to waiting does.
    pub async fn cycle(&mut self) -> Result<CycleOutcome> {
        let status = self.remote.fetch_search_status().await?;
        debug!("search status: {} (light_off={})", status.mode, status.light_off);

        match status.mode {
            Mode::Waiting => Ok(self.release(status.light_off).await),
            Mode::Searching if self.binding.is_none() => self.bind().await,
            Mode::Searching => self.apply_intent().await,
        }
    }

    async fn release(&mut self, light_off: bool) -> CycleOutcome {
        let Some(binding) = self.binding.take() else {
            return CycleOutcome::Idle;
        };

        let light_off = if light_off {
            Some(binding.device.set_off().await)
        } else {
            None
        };

        CycleOutcome::Released {
            address: binding.address,
            light_off,
        }
    }

    async fn bind(&mut self) -> Result<CycleOutcome> {
        let devices = self.discovery.discover().await?;
        let Some(device) = devices.into_iter().next() else {
            return Ok(CycleOutcome::NothingFound);
        };

        let binding = self.binding.insert(Binding::new(device));
        let effect = self.effect.run(&binding.device).await;

        Ok(CycleOutcome::Bound {
            address: binding.address,
            effect,
        })
    }

    async fn apply_intent(&self) -> Result<CycleOutcome> {
        let Some(binding) = &self.binding else {
            return Ok(CycleOutcome::Idle);
        };

        match self.remote.fetch_power().await? {
            PowerIntent::Off => {
                binding.device.set_off().await?;
                Ok(CycleOutcome::SwitchedOff)
            }
            PowerIntent::On => {
                let params = self.remote.fetch_light_info().await?;
                binding.device.set_on(&params).await?;
                Ok(CycleOutcome::SwitchedOn(params))
            }
        }
    }
}

fn log_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Idle => debug!("waiting"),
        CycleOutcome::Released { address, light_off } => match light_off {
            Some(Err(e)) => warn!("released {} but could not switch it off: {}", address, e),
            Some(Ok(())) => info!("released {} and switched it off", address),
            None => info!("released {}", address),
        },
        CycleOutcome::NothingFound => info!("no bulb found, retrying"),
        CycleOutcome::Bound { address, effect } => match effect {
            Ok(()) => info!("bound bulb at {}", address),
            Err(e) => warn!("bound bulb at {} but the search effect failed: {}", address, e),
        },
        CycleOutcome::SwitchedOff => debug!("light off"),
        CycleOutcome::SwitchedOn(params) => debug!("light on: {}", params),
    }
}

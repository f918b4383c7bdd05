//! In-memory collaborators for exercising the bridge without a network.

use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use crate::device::Device;
use crate::discovery::Discovery;
use crate::errors::Error;
use crate::remote::{Endpoint, RemoteState, SearchStatus};
use crate::types::{LightParameters, Mode, PowerIntent};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    On(LightParameters),
    Off,
}

pub(crate) fn timed_out() -> Error {
    Error::socket(
        "receive",
        std::io::Error::new(std::io::ErrorKind::TimedOut, "receive timeout"),
    )
}

pub(crate) fn server_error(endpoint: Endpoint) -> Error {
    Error::Status {
        endpoint,
        status: 500,
    }
}

/// Records every command; fails every command from the n-th one on.
#[derive(Debug, Clone)]
pub(crate) struct FakeLight {
    ip: Ipv4Addr,
    log: Arc<Mutex<Vec<(Instant, Command)>>>,
    fail_from: Option<usize>,
}

impl FakeLight {
    pub(crate) fn new(ip: Ipv4Addr) -> Self {
        FakeLight {
            ip,
            log: Arc::default(),
            fail_from: None,
        }
    }

    pub(crate) fn failing_from(mut self, n: usize) -> Self {
        self.fail_from = Some(n);
        self
    }

    pub(crate) fn commands(&self) -> Vec<Command> {
        self.timed_commands().into_iter().map(|(_, c)| c).collect()
    }

    pub(crate) fn timed_commands(&self) -> Vec<(Instant, Command)> {
        self.log.lock().unwrap().clone()
    }

    fn push(&self, command: Command) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        let index = log.len();
        log.push((Instant::now(), command));
        match self.fail_from {
            Some(n) if index >= n => Err(timed_out()),
            _ => Ok(()),
        }
    }
}

impl Device for FakeLight {
    fn address(&self) -> Ipv4Addr {
        self.ip
    }

    async fn set_on(&self, params: &LightParameters) -> Result<()> {
        self.push(Command::On(*params))
    }

    async fn set_off(&self) -> Result<()> {
        self.push(Command::Off)
    }
}

/// Hands out one scripted scan result per call; empty once the script runs out.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeScanner {
    scans: Arc<Mutex<VecDeque<Result<Vec<FakeLight>>>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeScanner {
    pub(crate) fn finding(self, lights: Vec<FakeLight>) -> Self {
        self.scans.lock().unwrap().push_back(Ok(lights));
        self
    }

    pub(crate) fn failing(self) -> Self {
        self.scans
            .lock()
            .unwrap()
            .push_back(Err(Error::socket(
                "bind",
                std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
            )));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Discovery for FakeScanner {
    type Device = FakeLight;

    async fn discover(&self) -> Result<Vec<FakeLight>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scans
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Serves scripted answers per endpoint and records which endpoints were hit.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeRemote {
    statuses: Arc<Mutex<VecDeque<Result<SearchStatus>>>>,
    powers: Arc<Mutex<VecDeque<Result<PowerIntent>>>>,
    infos: Arc<Mutex<VecDeque<Result<LightParameters>>>>,
    requests: Arc<Mutex<Vec<Endpoint>>>,
}

impl FakeRemote {
    pub(crate) fn status(self, mode: Mode, light_off: bool) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Ok(SearchStatus { mode, light_off }));
        self
    }

    pub(crate) fn status_error(self) -> Self {
        self.status_failure(server_error(Endpoint::SearchStatus))
    }

    pub(crate) fn status_failure(self, err: Error) -> Self {
        self.statuses.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn power(self, power: Result<PowerIntent>) -> Self {
        self.powers.lock().unwrap().push_back(power);
        self
    }

    pub(crate) fn info(self, info: Result<LightParameters>) -> Self {
        self.infos.lock().unwrap().push_back(info);
        self
    }

    pub(crate) fn requests(&self) -> Vec<Endpoint> {
        self.requests.lock().unwrap().clone()
    }

    fn next<T>(&self, endpoint: Endpoint, queue: &Mutex<VecDeque<Result<T>>>) -> Result<T> {
        self.requests.lock().unwrap().push(endpoint);
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(server_error(endpoint)))
    }
}

impl RemoteState for FakeRemote {
    async fn fetch_search_status(&self) -> Result<SearchStatus> {
        self.next(Endpoint::SearchStatus, &self.statuses)
    }

    async fn fetch_power(&self) -> Result<PowerIntent> {
        self.next(Endpoint::Power, &self.powers)
    }

    async fn fetch_light_info(&self) -> Result<LightParameters> {
        self.next(Endpoint::LightInfo, &self.infos)
    }
}

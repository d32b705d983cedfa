//! Interactive uninstall session: a control loop fed by one event channel.

pub mod controller;
pub mod event;
pub mod runner;
pub mod view;

use crate::models::config::Config;
use crate::workflow::controller::{Controller, Effect};
use crate::workflow::event::{Event, Input};
use crate::workflow::runner::{JobRunner, ThreadRunner};
use crate::workflow::view::{Frontend, Terminal};
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Runs the interactive session against the real terminal and returns the exit code.
pub fn run(config: &Config, dry_run: bool, verify_backups: bool) -> i32 {
    let (tx, rx) = mpsc::channel();
    spawn_input_reader(tx.clone());

    let mut runner = ThreadRunner::new(config.clone(), verify_backups, tx);
    let mut controller = Controller::new(config, dry_run);
    let mut frontend = Terminal::new();
    drive(&mut controller, &mut runner, &rx, &mut frontend)
}

/// Feeds events into `controller` until it asks to exit.
pub fn drive<R, F>(
    controller: &mut Controller,
    runner: &mut R,
    rx: &Receiver<Event>,
    frontend: &mut F,
) -> i32
where
    R: JobRunner,
    F: Frontend,
{
    let mut effect = controller.start();
    loop {
        match effect {
            Effect::Launch(job) => {
                log::debug!("launching {} job", job.name());
                effect = match runner.launch(job) {
                    Ok(()) => Effect::Continue,
                    Err(e) => controller.launch_failed(e),
                };
                continue;
            }
            Effect::Exit(code) => {
                log::debug!("session ended in {:?} with code {}", controller.phase(), code);
                frontend.render(&controller.view());
                return code;
            }
            Effect::Continue => {}
        }

        frontend.render(&controller.view());
        effect = match rx.recv() {
            Ok(event) => controller.handle(event),
            // Every sender is gone, nothing can ever arrive.
            Err(_) => controller.handle(Event::Input(Input::Quit)),
        };
    }
}

fn spawn_input_reader(tx: Sender<Event>) {
    let spawned = thread::Builder::new()
        .name("gosweep-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(Event::Input(Input::parse(&line))).is_err() {
                    return;
                }
            }
            let _ = tx.send(Event::Input(Input::Closed));
        });
    if let Err(e) = spawned {
        log::error!("failed to start input reader: {}", e);
    }
}

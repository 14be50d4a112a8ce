use heapsched::scheduler::{self, Timetable};
use heapsched::{route, Config, Error};
use itertools::Itertools;
use log::{error, info};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let args = env::args().collect_vec();
    let config_file = PathBuf::from(args.get(1).ok_or(Error::Usage)?);
    let config = Config::load(&config_file)?;
    info!("loaded {}", config_file.display());

    if let Some(r) = &config.route {
        let routes = route::shortest_routes(r)?;
        println!("{}", serde_json::to_string_pretty(&routes)?);
    }
    if config.tasks.is_empty() {
        return Ok(());
    }

    let timetable = Arc::new(Timetable::default());
    let (command_sender, command_receiver) = mpsc::channel(config.command_buffer);
    let (fired_sender, mut fired_receiver) = mpsc::unbounded_channel();
    let scheduler = tokio::spawn(scheduler::run(
        timetable.clone(),
        command_receiver,
        fired_sender,
    ));
    let now = Instant::now();
    for task in &config.tasks {
        command_sender
            .send(task.to_command(now))
            .await
            .map_err(|_| Error::Internal(anyhow::anyhow!("scheduler stopped").into()))?;
    }
    drop(command_sender);
    info!("{} tasks pending", timetable.len());

    let report = async {
        while let Some(f) = fired_receiver.recv().await {
            println!("{}", serde_json::to_string(&f)?);
        }
        scheduler
            .await
            .map_err(|e| Error::Internal(anyhow::Error::from(e).into()))??;
        Ok::<_, Error>(())
    };
    tokio::select! {
        r = report => r,
        r = watch_deadlocks() => r,
    }
}

const DEADLOCK_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 2);

async fn watch_deadlocks() -> Result<(), Error> {
    loop {
        tokio::time::sleep(DEADLOCK_CHECK_INTERVAL).await;
        let deadlocks = parking_lot::deadlock::check_deadlock();
        if let Some(d) = deadlocks.iter().find_map(|threads| threads.first()) {
            error!("{} deadlocked threads", deadlocks.len());
            return Err(Error::Internal(
                anyhow::anyhow!("deadlock in thread {:?}:\n{:?}", d.thread_id(), d.backtrace()).into(),
            ));
        }
    }
}

//! Shared launcher loop (`spec.md` §4.2): discover new files on an interval,
//! spawn one worker per discovery, and drain outstanding workers once
//! termination fires. One instantiation drives full-file trackables, another
//! drives tail trackables — only the worker future differs between them.

use crate::discovery::{discover_new_paths, GlobSource};
use crate::known_files::KnownFiles;
use crate::worker::WorkerContext;
use std::future::Future;
use std::path::PathBuf;
use tokio::task::JoinSet;

pub(crate) async fn run_launcher<T, Spawn, Fut>(
    trackables: Vec<T>,
    excluded: Vec<glob::Pattern>,
    known: KnownFiles,
    ctx: WorkerContext,
    spawn_worker: Spawn,
) where
    T: GlobSource + Clone + Send + 'static,
    Spawn: Fn(PathBuf, T, WorkerContext) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut tasks = JoinSet::new();

    while !ctx.termination.is_set() {
        let discovered = discover_new_paths(&trackables, &excluded, &known);
        for (index, path) in discovered {
            let trackable = trackables[index].clone();
            let label = multitrack_core::short_path(&path, 3);
            ctx.notify_new_file(&format!("tracking new file {label}"));
            tasks.spawn(spawn_worker(path, trackable, ctx.clone()));
        }

        tokio::select! {
            () = tokio::time::sleep(ctx.config.interval) => {}
            () = ctx.termination.wait() => break,
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;

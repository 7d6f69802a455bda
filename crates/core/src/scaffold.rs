//! The scaffold pipeline
//!
//! Builds the task graph that takes a template repository to a freshly
//! renamed project on disk, and runs it to completion. Cross-task data flows
//! through dependency results (the name gate reads the registry probe's
//! boolean), never through shared mutable state.

use serde_json::Value;

use crate::command;
use crate::config::{RegistryPolicy, SkaffConfig};
use crate::logger;
use crate::orchestrator::{self, Completion, TaskGraph};
use crate::project::ProjectTarget;
use crate::prompt;
use crate::registry::RegistryClient;
use crate::tree;
use crate::types::{SkaffError, SkaffResult};

/// Flags that alter confirmation behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaffoldOptions {
    /// Skip every confirmation (implies `assume_yes`).
    pub force: bool,
    /// Answer yes to every confirmation.
    pub assume_yes: bool,
}

impl ScaffoldOptions {
    fn skip_confirmations(&self) -> bool {
        self.force || self.assume_yes
    }
}

/// Orchestrates one scaffolding run for a single target.
pub struct Scaffolder {
    config: SkaffConfig,
    target: ProjectTarget,
    options: ScaffoldOptions,
}

impl Scaffolder {
    pub fn new(config: SkaffConfig, target: ProjectTarget, options: ScaffoldOptions) -> Self {
        Self {
            config,
            target,
            options,
        }
    }

    /// Run the whole pipeline; resolves once everything settled.
    pub async fn run(self) -> SkaffResult<()> {
        let graph = self.build_graph();
        orchestrator::run(graph).await?;
        Ok(())
    }

    /// The pipeline as an explicit task graph.
    pub fn build_graph(&self) -> TaskGraph {
        let mut graph = TaskGraph::new();
        let skip = self.options.skip_confirmations();

        {
            let policy = self.config.registry.policy;
            let url = self.config.registry.url.clone();
            let name = self.target.name.clone();
            graph.task("registry", &[], move |_inputs, completion| async move {
                if policy == RegistryPolicy::Off {
                    completion.resolve(Value::Bool(false));
                    return;
                }
                logger::info(format!(
                    "checking whether '{}' already exists on the registry...",
                    name
                ));
                match RegistryClient::new(url).name_taken(&name).await {
                    Ok(taken) => completion.resolve(Value::Bool(taken)),
                    Err(error) => {
                        // Availability is advisory; an unreachable registry
                        // must not block scaffolding.
                        logger::warn(format!("registry check failed: {}", error));
                        completion.resolve(Value::Bool(false));
                    }
                }
            });
        }

        {
            let path = self.target.path.clone();
            graph.task("confirm", &[], move |_inputs, completion| async move {
                if skip {
                    logger::info("no confirmation needed");
                    completion.resolve(Value::Null);
                    return;
                }
                match tokio::fs::try_exists(&path).await {
                    Ok(true) => completion.fail(SkaffError::Declined(format!(
                        "something already exists at '{}'; refusing to overwrite",
                        path.display()
                    ))),
                    Ok(false) => {
                        let question = format!(
                            "Do you wish to create your project at '{}'? (y/n)",
                            path.display()
                        );
                        match prompt::ask(&question).await {
                            Ok(true) => completion.resolve(Value::Null),
                            Ok(false) => completion.fail(SkaffError::Declined(
                                "next time you will need to answer in the affirmative".to_string(),
                            )),
                            Err(error) => completion.fail(error),
                        }
                    }
                    Err(error) => completion.fail(SkaffError::Io(error)),
                }
            });
        }

        {
            let policy = self.config.registry.policy;
            let name = self.target.name.clone();
            graph.task(
                "name_gate",
                &["confirm", "registry"],
                move |inputs, completion| async move {
                    let taken = inputs.get("registry").and_then(Value::as_bool).unwrap_or(false);
                    if !taken {
                        if policy != RegistryPolicy::Off {
                            logger::info(format!(
                                "'{}' does not appear to be taken on the registry",
                                name
                            ));
                        }
                        completion.resolve(Value::Null);
                        return;
                    }
                    if policy == RegistryPolicy::Gate && !skip {
                        let question = format!(
                            "'{}' is already taken on the registry, continue anyway? (y/n)",
                            name
                        );
                        match prompt::ask(&question).await {
                            Ok(true) => completion.resolve(Value::Null),
                            Ok(false) => completion.fail(SkaffError::Declined(
                                "next time you will need to answer in the affirmative".to_string(),
                            )),
                            Err(error) => completion.fail(error),
                        }
                    } else {
                        logger::warn(format!("'{}' appears to be taken on the registry", name));
                        completion.resolve(Value::Null);
                    }
                },
            );
        }

        {
            let parent = self.target.parent.clone();
            graph.task("prepare_dir", &["name_gate"], move |_inputs, completion| async move {
                logger::debug(format!("creating directory '{}'", parent.display()));
                let result = tokio::fs::create_dir_all(&parent)
                    .await
                    .map(|()| Value::Null)
                    .map_err(SkaffError::Io);
                settle(&completion, result);
            });
        }

        {
            let repository = self.config.template.repository.clone();
            let branch = self.config.template.branch.clone();
            let depth = self.config.template.depth;
            let parent = self.target.parent.clone();
            let name = self.target.name.clone();
            graph.task(
                "clone",
                &["name_gate", "prepare_dir"],
                move |_inputs, completion| async move {
                    logger::info(format!("cloning '{}'...", repository));
                    let args = vec![
                        "clone".to_string(),
                        format!("--depth={}", depth),
                        format!("--branch={}", branch),
                        repository,
                        name,
                    ];
                    let result = command::run("git", &args, &parent).await;
                    if result.is_ok() {
                        logger::info("git clone succeeded");
                    }
                    settle(&completion, result.map(|()| Value::Null));
                },
            );
        }

        {
            let git_dir = self.target.path.join(".git");
            graph.task("strip_git", &["clone"], move |_inputs, completion| async move {
                logger::info("removing the template's git history");
                let result = match tokio::fs::remove_dir_all(&git_dir).await {
                    Ok(()) => Ok(Value::Null),
                    Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Value::Null),
                    Err(error) => Err(SkaffError::Io(error)),
                };
                settle(&completion, result);
            });
        }

        {
            let argv = self.config.template.install.argv();
            let project = self.target.path.clone();
            graph.task("install", &["clone"], move |_inputs, completion| async move {
                if argv.is_empty() {
                    completion.resolve(Value::Null);
                    return;
                }
                logger::info("installing dependencies...");
                let result = command::run(&argv[0], &argv[1..], &project).await;
                if result.is_ok() {
                    logger::info("dependency install succeeded");
                }
                settle(&completion, result.map(|()| Value::Null));
            });
        }

        {
            let project = self.target.path.clone();
            let from = self.config.template.organization_placeholder.clone();
            let to = self.config.template.organization_replacement.clone();
            graph.task(
                "rename_org",
                &["clone", "install"],
                move |_inputs, completion| async move {
                    logger::info("replacing the organization placeholder");
                    let result =
                        run_blocking(move || tree::replace_in_tree(&project, &from, &to)).await;
                    settle(&completion, result.map(count_value));
                },
            );
        }

        {
            let project = self.target.path.clone();
            let from = self.config.template.library_placeholder.clone();
            let to = self.target.name.clone();
            graph.task(
                "rename_lib",
                &["rename_org", "install", "clone"],
                move |_inputs, completion| async move {
                    logger::info("replacing the library placeholder with the project name");
                    let result =
                        run_blocking(move || tree::replace_in_tree(&project, &from, &to)).await;
                    settle(&completion, result.map(count_value));
                },
            );
        }

        {
            let scripts = self.target.path.join(&self.config.template.scripts_dir);
            graph.task("chmod_scripts", &["clone"], move |_inputs, completion| async move {
                let result = run_blocking(move || tree::mark_scripts_executable(&scripts)).await;
                if let Ok(count) = &result {
                    logger::debug(format!("marked {} script(s) executable", count));
                }
                settle(&completion, result.map(count_value));
            });
        }

        graph
    }
}

fn settle(completion: &Completion, result: SkaffResult<Value>) {
    match result {
        Ok(value) => completion.resolve(value),
        Err(error) => completion.fail(error),
    }
}

fn count_value(count: usize) -> Value {
    Value::from(count as u64)
}

async fn run_blocking<T, F>(work: F) -> SkaffResult<T>
where
    F: FnOnce() -> SkaffResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| SkaffError::Io(std::io::Error::other(error)))?
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::SkaffConfig;

    fn scaffolder(options: ScaffoldOptions) -> Scaffolder {
        let target = ProjectTarget::resolve(Path::new("/tmp/skaff-tests"), "proj-x").unwrap();
        Scaffolder::new(SkaffConfig::default(), target, options)
    }

    #[test]
    fn graph_wiring_matches_the_pipeline() {
        let graph = scaffolder(ScaffoldOptions::default()).build_graph();

        assert_eq!(graph.len(), 10);
        assert!(graph.validate().is_ok());

        let deps = |name: &str| graph.dependencies_of(name).unwrap().to_vec();
        assert!(deps("registry").is_empty());
        assert!(deps("confirm").is_empty());
        assert_eq!(deps("name_gate"), vec!["confirm", "registry"]);
        assert_eq!(deps("prepare_dir"), vec!["name_gate"]);
        assert_eq!(deps("clone"), vec!["name_gate", "prepare_dir"]);
        assert_eq!(deps("strip_git"), vec!["clone"]);
        assert_eq!(deps("install"), vec!["clone"]);
        assert_eq!(deps("rename_org"), vec!["clone", "install"]);
        assert_eq!(deps("rename_lib"), vec!["rename_org", "install", "clone"]);
        assert_eq!(deps("chmod_scripts"), vec!["clone"]);
    }

    #[tokio::test]
    async fn existing_target_declines_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let target = ProjectTarget::resolve(dir.path(), "existing").unwrap();
        std::fs::create_dir_all(&target.path).unwrap();

        let mut config = SkaffConfig::default();
        config.registry.policy = RegistryPolicy::Off;

        let error = Scaffolder::new(config, target.clone(), ScaffoldOptions::default())
            .run()
            .await
            .unwrap_err();

        assert!(matches!(error, SkaffError::Declined(_)));
        // Nothing downstream of the declined confirmation may have run.
        let entries: Vec<_> = std::fs::read_dir(&target.path).unwrap().collect();
        assert!(entries.is_empty());
    }
}

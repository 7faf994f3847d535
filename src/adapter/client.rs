use super::config::SvnConfig;
use crate::common::wait::wait_until;
use crate::common::{SvnError, SvnResult};
use crate::domain::{
    Annotations, DirEntry, Info, LogMessage, Property, Revision, Status, SvnUrl, Target,
};
use crate::infrastructure::notify::{NotificationHandler, NotifyListener, SvnCommandKind};
use crate::infrastructure::parsers;
use crate::infrastructure::process::{ProcessRunner, SvnProcess};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of one tool invocation after output digestion.
struct Execution {
    stdout: Vec<u8>,
    revision: Option<u64>,
}

impl Execution {
    fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Typed client over the Subversion command-line tool.
///
/// One public operation per repository action. Each call builds the
/// argument vector, spawns exactly one child process, blocks until it
/// exits, feeds captured output through the notification dispatcher
/// and returns parsed domain records. Commit and lock acquisition are
/// additionally wrapped in a bounded retry loop for transient lock
/// contention.
///
/// The client is `Send + Sync`; listener registration is safe while
/// other tasks drive operations on the same instance. Revisions
/// observed during an operation are returned from that operation, not
/// kept as shared state.
///
/// # Examples
///
/// ```rust,no_run
/// use svncmd::adapter::{client::SvnClient, config::SvnConfig};
/// use svncmd::domain::{Revision, Target};
///
/// # async fn example() -> svncmd::SvnResult<()> {
/// let client = SvnClient::new(SvnConfig::new().with_credentials("alice", "secret"));
/// let url = "svn://host/repo/trunk".parse().unwrap();
/// let messages = client
///     .get_log_messages(
///         &Target::Url(url),
///         Some(&Revision::Number(100)),
///         Some(&Revision::Head),
///         true,
///     )
///     .await?;
/// for message in messages {
///     println!("r{} {}", message.revision, message.message);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SvnClient {
    config: SvnConfig,
    runner: Arc<dyn ProcessRunner>,
    notifier: NotificationHandler,
}

impl SvnClient {
    /// Create a client that spawns the configured executable.
    pub fn new(config: SvnConfig) -> Self {
        Self::with_runner(config, Arc::new(SvnProcess::new()))
    }

    /// Create a client over a custom process runner (the test seam).
    pub fn with_runner(config: SvnConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            config,
            runner,
            notifier: NotificationHandler::new(),
        }
    }

    /// Register a progress listener.
    pub fn add_notify_listener(&self, listener: Arc<dyn NotifyListener>) {
        self.notifier.add(listener);
    }

    /// Remove a previously registered listener.
    pub fn remove_notify_listener(&self, listener: &Arc<dyn NotifyListener>) {
        self.notifier.remove(listener);
    }

    // ---- invocation core ----------------------------------------------

    /// Append the flags every invocation carries: credentials when
    /// configured and non-empty, prompt suppression always, and the
    /// configuration directory when one is set.
    fn append_global_args(&self, args: &mut Vec<String>) {
        if let Some(username) = self.config.username.as_deref().filter(|u| !u.is_empty()) {
            args.push("--username".to_string());
            args.push(username.to_string());
        }
        if let Some(password) = self.config.password.as_deref().filter(|p| !p.is_empty()) {
            args.push("--password".to_string());
            args.push(password.to_string());
        }
        args.push("--non-interactive".to_string());
        if let Some(dir) = &self.config.config_dir {
            args.push("--config-dir".to_string());
            args.push(dir.display().to_string());
        }
    }

    /// The command line as shown to listeners, password redacted.
    fn display_command(&self, args: &[String]) -> String {
        let mut shown = Vec::with_capacity(args.len() + 1);
        shown.push(self.config.executable.clone());
        let mut mask_next = false;
        for arg in args {
            if mask_next {
                shown.push("*****".to_string());
                mask_next = false;
            } else {
                shown.push(arg.clone());
                mask_next = arg == "--password";
            }
        }
        shown.join(" ")
    }

    async fn execute(
        &self,
        kind: SvnCommandKind,
        output_is_notification: bool,
        mut args: Vec<String>,
        digest_output: bool,
    ) -> SvnResult<Execution> {
        self.notifier.set_command(kind, output_is_notification);
        self.append_global_args(&mut args);
        self.notifier.log_command_line(&self.display_command(&args));

        let invocation = self.runner.run(&self.config.executable, &args);
        let result = match self.config.timeout {
            Some(deadline) => {
                crate::common::result::async_helpers::with_timeout(invocation, deadline).await
            }
            None => invocation.await,
        };

        match result {
            Ok(output) => {
                let revision = if digest_output {
                    self.notifier.notify_from_output(&output.stdout_text())
                } else {
                    None
                };
                Ok(Execution {
                    stdout: output.stdout,
                    revision,
                })
            }
            Err(err) => {
                self.notifier.log_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Run a text-producing command and digest its output into
    /// listener events.
    async fn run(
        &self,
        kind: SvnCommandKind,
        output_is_notification: bool,
        args: Vec<String>,
    ) -> SvnResult<Execution> {
        self.execute(kind, output_is_notification, args, true).await
    }

    /// Run a command whose stdout is a data stream (file content,
    /// property values, diffs): captured raw, never forwarded to
    /// listeners.
    async fn run_raw(&self, kind: SvnCommandKind, args: Vec<String>) -> SvnResult<Execution> {
        self.execute(kind, false, args, false).await
    }

    /// Run with the bounded lock-contention retry loop.
    ///
    /// Only failures classified as lock contention are retried; the
    /// first such failure is what surfaces if every attempt fails.
    async fn run_with_retry(
        &self,
        kind: SvnCommandKind,
        output_is_notification: bool,
        args: Vec<String>,
    ) -> SvnResult<Execution> {
        let policy = self.config.retry;
        let mut first_contention: Option<SvnError> = None;
        for attempt in 0..=policy.attempts {
            match self.run(kind, output_is_notification, args.clone()).await {
                Ok(execution) => return Ok(execution),
                Err(err) if err.is_lock_contention() => {
                    if attempt == policy.attempts {
                        return Err(first_contention.unwrap_or(err));
                    }
                    tracing::warn!(attempt, %kind, "target locked by a concurrent operation; retrying");
                    if first_contention.is_none() {
                        first_contention = Some(err);
                    }
                    tokio::time::sleep(policy.interval).await;
                }
                Err(err) => return Err(err),
            }
        }
        unreachable!("retry loop returns from its final attempt");
    }

    // ---- helpers ------------------------------------------------------

    fn path_arg(path: &Path) -> String {
        path.display().to_string()
    }

    fn absolutize(path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    }

    /// Common ancestor directory used to relativize notification paths.
    fn base_dir_of(paths: &[&Path]) -> Option<PathBuf> {
        let absolute: Vec<PathBuf> = paths.iter().map(|p| Self::absolutize(p)).collect();
        let (first, rest) = absolute.split_first()?;
        let mut common = first.clone();
        if !common.is_dir() {
            common.pop();
        }
        for path in rest {
            while !path.starts_with(&common) {
                if !common.pop() {
                    return None;
                }
            }
        }
        Some(common)
    }

    fn set_base_dir_for(&self, paths: &[&Path]) {
        self.notifier.set_base_dir(Self::base_dir_of(paths));
    }

    // ---- availability -------------------------------------------------

    /// The tool's version banner, e.g. `svn, version 1.4.2 (r22196)`.
    pub async fn version(&self) -> SvnResult<String> {
        self.notifier.disable_log();
        let result = self
            .run(SvnCommandKind::Undefined, false, vec!["--version".to_string()])
            .await;
        self.notifier.enable_log();
        let execution = result?;
        let text = execution.stdout_text();
        Ok(text.lines().next().unwrap_or_default().to_string())
    }

    /// Whether the configured executable can be invoked at all.
    pub async fn is_available(&self) -> bool {
        self.version().await.is_ok()
    }

    // ---- working-copy mutation ----------------------------------------

    /// Put a file under version control.
    ///
    /// Adding something already versioned makes the tool warn and exit
    /// nonzero; that warning is not an error here.
    pub async fn add_file(&self, path: &Path) -> SvnResult<()> {
        self.set_base_dir_for(&[path]);
        let args = vec![
            "add".to_string(),
            "-N".to_string(),
            Self::path_arg(path),
        ];
        match self.run(SvnCommandKind::Add, true, args).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_warning() => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Put a directory under version control, optionally with its
    /// children.
    pub async fn add_directory(&self, path: &Path, recurse: bool) -> SvnResult<()> {
        self.set_base_dir_for(&[path]);
        let mut args = vec!["add".to_string()];
        if !recurse {
            args.push("-N".to_string());
        }
        args.push(Self::path_arg(path));
        match self.run(SvnCommandKind::Add, true, args).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_warning() => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Materialize a working copy of `url` at `dest`.
    ///
    /// Returns the revision the checkout completed against, when the
    /// output reported one.
    pub async fn checkout(
        &self,
        url: &SvnUrl,
        dest: &Path,
        revision: Option<&Revision>,
        recurse: bool,
    ) -> SvnResult<Option<u64>> {
        self.set_base_dir_for(&[dest]);
        let mut args = vec![
            "co".to_string(),
            "-r".to_string(),
            Revision::arg_or_head(revision),
            url.to_string(),
            Self::path_arg(dest),
        ];
        if !recurse {
            args.push("-N".to_string());
        }
        let execution = self.run(SvnCommandKind::Checkout, true, args).await?;
        Ok(execution.revision)
    }

    /// Send local changes to the repository.
    ///
    /// Returns the new revision number, or `None` when there was
    /// nothing to commit. Retried while the working copy is locked by
    /// a concurrent operation.
    pub async fn commit(
        &self,
        paths: &[&Path],
        message: &str,
        recurse: bool,
        keep_locks: bool,
    ) -> SvnResult<Option<u64>> {
        self.set_base_dir_for(paths);
        let mut args = vec!["ci".to_string()];
        if !recurse {
            args.push("-N".to_string());
        }
        if keep_locks {
            args.push("--no-unlock".to_string());
        }
        args.push("--force-log".to_string());
        args.push("-m".to_string());
        args.push(message.to_string());
        for path in paths {
            args.push(Self::path_arg(path));
        }
        let execution = self
            .run_with_retry(SvnCommandKind::Commit, true, args)
            .await?;
        Ok(execution.revision)
    }

    /// Bring repository changes into the working copy.
    ///
    /// Returns the revision the working copy ended up at, when the
    /// output reported one.
    pub async fn update(
        &self,
        path: &Path,
        revision: Option<&Revision>,
    ) -> SvnResult<Option<u64>> {
        self.set_base_dir_for(&[path]);
        let args = vec![
            "up".to_string(),
            "-r".to_string(),
            Revision::arg_or_head(revision),
            Self::path_arg(path),
        ];
        let execution = self.run(SvnCommandKind::Update, true, args).await?;
        Ok(execution.revision)
    }

    /// Undo local edits.
    pub async fn revert(&self, paths: &[&Path], recurse: bool) -> SvnResult<()> {
        self.set_base_dir_for(paths);
        let mut args = vec!["revert".to_string()];
        if recurse {
            args.push("-R".to_string());
        }
        for path in paths {
            args.push(Self::path_arg(path));
        }
        self.run(SvnCommandKind::Revert, true, args).await?;
        Ok(())
    }

    /// Clear the conflicted state on a path.
    ///
    /// The tool prints nothing notification-shaped for this, so
    /// listeners are told about the path by hand.
    pub async fn resolved(&self, path: &Path, recurse: bool) -> SvnResult<()> {
        self.set_base_dir_for(&[path]);
        let mut args = vec!["resolved".to_string()];
        if recurse {
            args.push("-R".to_string());
        }
        args.push(Self::path_arg(path));
        self.run(SvnCommandKind::Resolved, true, args).await?;
        self.notifier.notify_change(path);
        Ok(())
    }

    /// Recursively clean up the working copy, releasing stale locks
    /// and resuming interrupted operations.
    pub async fn cleanup(&self, path: &Path) -> SvnResult<()> {
        self.set_base_dir_for(&[path]);
        let args = vec!["cleanup".to_string(), Self::path_arg(path)];
        self.run(SvnCommandKind::Cleanup, true, args).await?;
        Ok(())
    }

    // ---- status and info ----------------------------------------------

    /// Status of each path, in input order.
    ///
    /// Paths in directories that are not working copies never reach
    /// the tool (it would stop at the first such path); they come back
    /// as unmanaged records directly. An empty input invokes nothing:
    /// the bare commands would otherwise run against an implicit
    /// default path.
    pub async fn get_status(&self, paths: &[&Path]) -> SvnResult<Vec<Status>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        self.set_base_dir_for(paths);

        let mut slots: Vec<Option<Status>> = vec![None; paths.len()];
        let mut versioned: Vec<&Path> = Vec::new();
        for (index, &path) in paths.iter().enumerate() {
            if Self::in_managed_dir(path) {
                versioned.push(path);
            } else {
                slots[index] = Some(Status::unmanaged(Self::absolutize(path), false));
            }
        }

        if !versioned.is_empty() {
            let mut status_args = vec![
                "status".to_string(),
                "-v".to_string(),
                "-N".to_string(),
                "--no-ignore".to_string(),
            ];
            let mut info_args = vec!["info".to_string()];
            for path in &versioned {
                status_args.push(Self::path_arg(path));
                info_args.push(Self::path_arg(path));
            }

            match self.query_statuses(status_args, info_args).await {
                Ok(statuses) => {
                    for status in statuses {
                        let status_abs = Self::absolutize(status.path());
                        let slot = paths.iter().enumerate().find_map(|(index, &path)| {
                            (slots[index].is_none() && Self::absolutize(path) == status_abs)
                                .then_some(index)
                        });
                        if let Some(index) = slot {
                            slots[index] = Some(status);
                        }
                    }
                }
                // A "not a working copy" failure is downgraded: the
                // unfilled slots become unmanaged records below.
                Err(err) => {
                    if !err.is_not_working_copy() {
                        return Err(err);
                    }
                }
            }
        }

        Ok(slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| Status::unmanaged(Self::absolutize(paths[index]), false))
            })
            .collect())
    }

    /// Status of one path; never fails for unmanaged paths.
    pub async fn get_single_status(&self, path: &Path) -> SvnResult<Status> {
        let mut statuses = self.get_status(&[path]).await?;
        Ok(statuses.remove(0))
    }

    /// Status of a working-copy tree.
    ///
    /// `all_entries` reports uninteresting (unmodified and ignored)
    /// items too; otherwise only local modifications show up. A target
    /// that is not a working copy at all is downgraded to a single
    /// unmanaged record rather than an error.
    pub async fn get_status_tree(
        &self,
        path: &Path,
        descend: bool,
        all_entries: bool,
    ) -> SvnResult<Vec<Status>> {
        self.set_base_dir_for(&[path]);
        let mut status_args = vec!["status".to_string(), "-v".to_string()];
        if !all_entries {
            status_args.push("-q".to_string());
        }
        if !descend {
            status_args.push("-N".to_string());
        }
        if all_entries {
            status_args.push("--no-ignore".to_string());
        }
        status_args.push(Self::path_arg(path));

        let status_execution = match self.run(SvnCommandKind::Status, false, status_args).await {
            Ok(execution) => execution,
            Err(err) if err.is_not_working_copy() => {
                return Ok(vec![Status::unmanaged(Self::absolutize(path), false)]);
            }
            Err(err) => return Err(err),
        };
        let parts = parsers::parse_status_parts(&status_execution.stdout_text())?;
        if parts.is_empty() {
            return Ok(Vec::new());
        }

        let mut info_args = vec!["info".to_string()];
        for part in &parts {
            info_args.push(Self::path_arg(&part.path));
        }
        let info_execution = match self.run(SvnCommandKind::Info, false, info_args).await {
            Ok(execution) => execution,
            Err(err) if err.is_not_working_copy() => {
                return Ok(vec![Status::unmanaged(Self::absolutize(path), false)]);
            }
            Err(err) => return Err(err),
        };
        let infos = parsers::parse_info_parts(&info_execution.stdout_text())?;
        Ok(parsers::compose_statuses(&parts, &infos))
    }

    async fn query_statuses(
        &self,
        status_args: Vec<String>,
        info_args: Vec<String>,
    ) -> SvnResult<Vec<Status>> {
        let status_execution = self.run(SvnCommandKind::Status, false, status_args).await?;
        let info_execution = self.run(SvnCommandKind::Info, false, info_args).await?;
        let parts = parsers::parse_status_parts(&status_execution.stdout_text())?;
        let infos = parsers::parse_info_parts(&info_execution.stdout_text())?;
        Ok(parsers::compose_statuses(&parts, &infos))
    }

    /// Whether the directory holding `path` is under version control.
    fn in_managed_dir(path: &Path) -> bool {
        let absolute = Self::absolutize(path);
        let dir = if absolute.is_dir() {
            absolute
        } else {
            match absolute.parent() {
                Some(parent) => parent.to_path_buf(),
                None => return false,
            }
        };
        dir.join(".svn").exists()
    }

    /// Metadata for one target.
    pub async fn get_info(&self, target: &Target) -> SvnResult<Info> {
        let mut infos = self.get_info_many(std::slice::from_ref(target)).await?;
        if infos.is_empty() {
            return Err(SvnError::parse_error(
                "info",
                format!("no info block for '{target}'"),
            ));
        }
        Ok(infos.remove(0))
    }

    /// Metadata for a working-copy path, with notification paths
    /// relativized against it.
    pub async fn get_info_from_working_copy(&self, path: &Path) -> SvnResult<Info> {
        self.set_base_dir_for(&[path]);
        self.get_info(&Target::Path(path.to_path_buf())).await
    }

    /// Metadata for several targets; an empty input invokes nothing.
    pub async fn get_info_many(&self, targets: &[Target]) -> SvnResult<Vec<Info>> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        let mut args = vec!["info".to_string()];
        for target in targets {
            args.push(target.as_arg());
        }
        let execution = self.run(SvnCommandKind::Info, false, args).await?;
        parsers::parse_info_parts(&execution.stdout_text())
    }

    // ---- history and content ------------------------------------------

    /// Log entries for a target over a revision range, newest first as
    /// the tool emits them. Change paths are fetched only when asked:
    /// they require the verbose flag and cost a server walk.
    pub async fn get_log_messages(
        &self,
        target: &Target,
        start: Option<&Revision>,
        end: Option<&Revision>,
        fetch_change_paths: bool,
    ) -> SvnResult<Vec<LogMessage>> {
        let range = format!(
            "{}:{}",
            Revision::arg_or_head(start),
            Revision::arg_or_head(end)
        );
        let mut args = vec![
            "log".to_string(),
            "-r".to_string(),
            range,
            target.as_arg(),
            "--xml".to_string(),
        ];
        if fetch_change_paths {
            args.push("-v".to_string());
        }
        let execution = self.run(SvnCommandKind::Log, false, args).await?;
        parsers::parse_log(&execution.stdout_text())
    }

    /// Directory entries of a repository path or URL.
    pub async fn get_list(
        &self,
        target: &Target,
        revision: Option<&Revision>,
        recurse: bool,
    ) -> SvnResult<Vec<DirEntry>> {
        let mut args = vec!["list".to_string()];
        if recurse {
            args.push("-R".to_string());
        }
        args.push("--xml".to_string());
        args.push("-r".to_string());
        args.push(Revision::arg_or_head(revision));
        args.push(target.as_arg());
        let execution = self.run(SvnCommandKind::List, false, args).await?;
        parsers::parse_list(&execution.stdout_text())
    }

    /// The directory entry describing `url` itself, found by listing
    /// its parent. `None` when the parent listing does not contain it
    /// or `url` is a repository root.
    pub async fn get_dir_entry(
        &self,
        url: &SvnUrl,
        revision: Option<&Revision>,
    ) -> SvnResult<Option<DirEntry>> {
        let Some(parent) = url.parent() else {
            return Ok(None);
        };
        let Some(expected) = url.last_path_segment() else {
            return Ok(None);
        };
        let entries = self
            .get_list(&Target::Url(parent), revision, false)
            .await?;
        Ok(entries.into_iter().find(|entry| entry.path == expected))
    }

    /// Raw content of a file at a revision.
    pub async fn get_content(
        &self,
        target: &Target,
        revision: Option<&Revision>,
    ) -> SvnResult<Vec<u8>> {
        let args = vec![
            "cat".to_string(),
            "-r".to_string(),
            Revision::arg_or_head(revision),
            target.as_arg(),
        ];
        let execution = self.run_raw(SvnCommandKind::Cat, args).await?;
        Ok(execution.stdout)
    }

    /// Per-line authorship of a file.
    ///
    /// The range defaults to the file's full history (revision 1 up to
    /// `HEAD`).
    pub async fn get_annotations(
        &self,
        target: &Target,
        start: Option<&Revision>,
        end: Option<&Revision>,
    ) -> SvnResult<Annotations> {
        let start = start.copied().unwrap_or(Revision::Number(1));
        let range = format!("{}:{}", start, Revision::arg_or_head(end));
        let args = vec![
            "annotate".to_string(),
            "-r".to_string(),
            range,
            target.as_arg(),
        ];
        let execution = self.run(SvnCommandKind::Annotate, false, args).await?;
        parsers::parse_annotations(&execution.stdout_text())
    }

    /// Write the differences between two targets to `out_file` as a
    /// unified diff.
    ///
    /// Defaults mirror the tool: the old side at `BASE`, the new side
    /// at `WORKING`, the new target the old one. A `WORKING` end
    /// revision is expressed as a single `-r` argument; the tool does
    /// not accept it inside a range.
    #[allow(clippy::too_many_arguments)]
    pub async fn diff(
        &self,
        old: &Target,
        old_revision: Option<&Revision>,
        new: Option<&Target>,
        new_revision: Option<&Revision>,
        out_file: &Path,
        recurse: bool,
    ) -> SvnResult<()> {
        let old_rev = old_revision.copied().unwrap_or(Revision::Base);
        let new_rev = new_revision.copied().unwrap_or(Revision::Working);
        let new = new.cloned().unwrap_or_else(|| old.clone());

        let mut args = vec!["diff".to_string(), "-r".to_string()];
        if new_rev == Revision::Working {
            args.push(old_rev.to_string());
        } else {
            args.push(format!("{old_rev}:{new_rev}"));
        }
        if !recurse {
            args.push("-N".to_string());
        }
        args.push("--old".to_string());
        args.push(old.as_arg());
        args.push("--new".to_string());
        args.push(new.as_arg());

        let execution = self.run_raw(SvnCommandKind::Diff, args).await?;
        tokio::fs::write(out_file, &execution.stdout).await?;
        Ok(())
    }

    /// Export an unversioned tree of `src` at `revision` to `dest`.
    pub async fn export(
        &self,
        src: &Target,
        dest: &Path,
        revision: Option<&Revision>,
        force: bool,
    ) -> SvnResult<()> {
        let mut args = vec![
            "export".to_string(),
            "-r".to_string(),
            Revision::arg_or_head(revision),
            src.as_arg(),
            Self::path_arg(dest),
        ];
        if force {
            args.push("--force".to_string());
        }
        self.run(SvnCommandKind::Export, true, args).await?;
        Ok(())
    }

    /// Commit an unversioned tree into the repository.
    pub async fn import(
        &self,
        path: &Path,
        url: &SvnUrl,
        message: &str,
        recurse: bool,
    ) -> SvnResult<()> {
        self.set_base_dir_for(&[path]);
        let mut args = vec![
            "import".to_string(),
            Self::path_arg(path),
            url.to_string(),
        ];
        if !recurse {
            args.push("-N".to_string());
        }
        args.push("--force-log".to_string());
        args.push("-m".to_string());
        args.push(message.to_string());
        self.run(SvnCommandKind::Import, true, args).await?;
        Ok(())
    }

    // ---- copy / move / mkdir / remove ---------------------------------

    /// Create a directory in the repository.
    pub async fn mkdir(&self, url: &SvnUrl, message: &str) -> SvnResult<()> {
        let args = vec![
            "mkdir".to_string(),
            "--force-log".to_string(),
            "-m".to_string(),
            message.to_string(),
            url.to_string(),
        ];
        self.run(SvnCommandKind::Mkdir, true, args).await?;
        Ok(())
    }

    /// Create and schedule a directory in the working copy.
    ///
    /// The directory can appear on disk slightly after the tool
    /// returns; this polls for it within the configured bounds and
    /// reports a timeout when it never shows up. Best effort: the
    /// schedule change itself has already happened.
    pub async fn mkdir_local(&self, path: &Path) -> SvnResult<()> {
        let args = vec!["mkdir".to_string(), Self::path_arg(path)];
        self.run(SvnCommandKind::Mkdir, true, args).await?;
        if !wait_until(&self.config.poll, || path.exists()).await {
            return Err(SvnError::timeout(self.config.poll.max_wait()));
        }
        Ok(())
    }

    /// Copy with history inside the working copy.
    ///
    /// Polls for the destination to materialize, like
    /// [`SvnClient::mkdir_local`].
    pub async fn copy_local(&self, src: &Path, dest: &Path) -> SvnResult<()> {
        let args = vec![
            "cp".to_string(),
            Self::path_arg(src),
            Self::path_arg(dest),
        ];
        self.run(SvnCommandKind::Copy, true, args).await?;
        if !wait_until(&self.config.poll, || dest.exists()).await {
            return Err(SvnError::timeout(self.config.poll.max_wait()));
        }
        Ok(())
    }

    /// Server-side copy, used to branch and tag.
    pub async fn copy_url(
        &self,
        src: &SvnUrl,
        dest: &SvnUrl,
        message: &str,
        revision: Option<&Revision>,
    ) -> SvnResult<()> {
        let mut args = vec!["cp".to_string()];
        if let Some(revision) = revision {
            args.push("-r".to_string());
            args.push(revision.to_string());
        }
        args.push("--force-log".to_string());
        args.push("-m".to_string());
        args.push(message.to_string());
        args.push(src.to_string());
        args.push(dest.to_string());
        self.run(SvnCommandKind::Copy, true, args).await?;
        Ok(())
    }

    /// Commit a copy of a working-copy path directly to a URL.
    pub async fn copy_to_url(&self, src: &Path, dest: &SvnUrl, message: &str) -> SvnResult<()> {
        let args = vec![
            "cp".to_string(),
            "--force-log".to_string(),
            "-m".to_string(),
            message.to_string(),
            Self::path_arg(src),
            dest.to_string(),
        ];
        self.run(SvnCommandKind::Copy, true, args).await?;
        Ok(())
    }

    /// Check a URL out into the working copy as a copy with history.
    pub async fn copy_from_url(
        &self,
        src: &SvnUrl,
        dest: &Path,
        revision: Option<&Revision>,
    ) -> SvnResult<()> {
        let mut args = vec!["cp".to_string()];
        if let Some(revision) = revision {
            args.push("-r".to_string());
            args.push(revision.to_string());
        }
        args.push(src.to_string());
        args.push(Self::path_arg(dest));
        self.run(SvnCommandKind::Copy, true, args).await?;
        Ok(())
    }

    /// Move or rename inside the working copy.
    pub async fn move_local(&self, src: &Path, dest: &Path, force: bool) -> SvnResult<()> {
        self.set_base_dir_for(&[src, dest]);
        let mut args = vec![
            "mv".to_string(),
            Self::path_arg(src),
            Self::path_arg(dest),
        ];
        if force {
            args.push("--force".to_string());
        }
        self.run(SvnCommandKind::Move, true, args).await?;
        Ok(())
    }

    /// Server-side move or rename.
    pub async fn move_url(
        &self,
        src: &SvnUrl,
        dest: &SvnUrl,
        message: &str,
        revision: Option<&Revision>,
    ) -> SvnResult<()> {
        let mut args = vec!["mv".to_string()];
        if let Some(revision) = revision {
            args.push("-r".to_string());
            args.push(revision.to_string());
        }
        args.push(src.to_string());
        args.push(dest.to_string());
        args.push("--force-log".to_string());
        args.push("-m".to_string());
        args.push(message.to_string());
        self.run(SvnCommandKind::Move, true, args).await?;
        Ok(())
    }

    /// Remove targets from version control (and the repository, when
    /// targets are URLs).
    pub async fn remove(
        &self,
        targets: &[Target],
        message: Option<&str>,
        force: bool,
    ) -> SvnResult<()> {
        let mut args = vec!["rm".to_string()];
        if let Some(message) = message {
            args.push("--force-log".to_string());
            args.push("-m".to_string());
            args.push(message.to_string());
        }
        if force {
            args.push("--force".to_string());
        }
        for target in targets {
            args.push(target.as_arg());
        }
        self.run(SvnCommandKind::Remove, true, args).await?;
        Ok(())
    }

    // ---- properties ---------------------------------------------------

    /// Read a property value, binary-safe. `None` when the property is
    /// not set on the path.
    pub async fn property_get(&self, path: &Path, name: &str) -> SvnResult<Option<Property>> {
        let args = vec![
            "propget".to_string(),
            "--strict".to_string(),
            name.to_string(),
            Self::path_arg(path),
        ];
        let execution = self.run_raw(SvnCommandKind::Propget, args).await?;
        if execution.stdout.is_empty() {
            return Ok(None);
        }
        Ok(Some(Property::new(name, path, execution.stdout)))
    }

    /// Set a property to a textual value.
    ///
    /// The tool emits nothing notification-shaped for property
    /// changes, so every affected path reported by a follow-up status
    /// check is announced to listeners by hand.
    pub async fn property_set(
        &self,
        path: &Path,
        name: &str,
        value: &str,
        recurse: bool,
    ) -> SvnResult<()> {
        let mut args = vec!["propset".to_string()];
        if recurse {
            args.push("-R".to_string());
        }
        args.push(name.to_string());
        args.push(value.to_string());
        args.push(Self::path_arg(path));
        self.run(SvnCommandKind::Propset, false, args).await?;
        self.notify_property_targets(path, recurse).await?;
        Ok(())
    }

    /// Set a property from a file, for binary values.
    pub async fn property_set_file(
        &self,
        path: &Path,
        name: &str,
        value_file: &Path,
        recurse: bool,
    ) -> SvnResult<()> {
        let mut args = vec!["propset".to_string()];
        if recurse {
            args.push("-R".to_string());
        }
        args.push(name.to_string());
        args.push("-F".to_string());
        args.push(Self::path_arg(value_file));
        args.push(Self::path_arg(path));
        self.run(SvnCommandKind::Propset, false, args).await?;
        self.notify_property_targets(path, recurse).await?;
        Ok(())
    }

    /// Remove a property.
    pub async fn property_del(&self, path: &Path, name: &str, recurse: bool) -> SvnResult<()> {
        let mut args = vec!["propdel".to_string()];
        if recurse {
            args.push("-R".to_string());
        }
        args.push(name.to_string());
        args.push(Self::path_arg(path));
        self.run(SvnCommandKind::Propdel, true, args).await?;
        self.notify_property_targets(path, recurse).await?;
        Ok(())
    }

    /// Manual change notification for property operations.
    async fn notify_property_targets(&self, path: &Path, recurse: bool) -> SvnResult<()> {
        let statuses = self.get_status_tree(path, recurse, false).await?;
        for status in &statuses {
            self.notifier.notify_change(status.path());
        }
        Ok(())
    }

    /// All properties of a path, each fetched binary-safe.
    pub async fn get_properties(&self, path: &Path) -> SvnResult<Vec<Property>> {
        let args = vec![
            "proplist".to_string(),
            Self::path_arg(path),
        ];
        let execution = self.run(SvnCommandKind::Proplist, false, args).await?;
        let names = parsers::parse_property_names(&execution.stdout_text())?;
        let mut properties = Vec::with_capacity(names.len());
        for name in names {
            if let Some(property) = self.property_get(path, &name).await? {
                properties.push(property);
            }
        }
        Ok(properties)
    }

    /// Set an unversioned revision property (e.g. `svn:log`).
    pub async fn set_rev_property(
        &self,
        url: &SvnUrl,
        revision: u64,
        name: &str,
        value: &str,
        force: bool,
    ) -> SvnResult<()> {
        let mut args = vec![
            "propset".to_string(),
            name.to_string(),
            "--revprop".to_string(),
            value.to_string(),
            url.to_string(),
            "-r".to_string(),
            revision.to_string(),
        ];
        if force {
            args.push("--force".to_string());
        }
        self.run(SvnCommandKind::Propset, false, args).await?;
        Ok(())
    }

    // ---- switch / merge -----------------------------------------------

    /// Point the working copy at a different URL within the repository.
    pub async fn switch_to_url(
        &self,
        path: &Path,
        url: &SvnUrl,
        revision: Option<&Revision>,
    ) -> SvnResult<Option<u64>> {
        self.set_base_dir_for(&[path]);
        let args = vec![
            "sw".to_string(),
            url.to_string(),
            Self::path_arg(path),
            "-r".to_string(),
            Revision::arg_or_head(revision),
        ];
        let execution = self.run(SvnCommandKind::Switch, true, args).await?;
        Ok(execution.revision)
    }

    /// Apply the differences between two sources to a working copy.
    ///
    /// With identical sources the range form `-r A:B` is used; with
    /// distinct sources each side is pegged as `TARGET@REV`.
    #[allow(clippy::too_many_arguments)]
    pub async fn merge(
        &self,
        from: &Target,
        from_revision: Option<&Revision>,
        to: &Target,
        to_revision: Option<&Revision>,
        local_path: &Path,
        force: bool,
        recurse: bool,
        dry_run: bool,
    ) -> SvnResult<()> {
        self.set_base_dir_for(&[local_path]);
        let mut args = vec!["merge".to_string()];
        if !recurse {
            args.push("-N".to_string());
        }
        if force {
            args.push("--force".to_string());
        }
        if dry_run {
            args.push("--dry-run".to_string());
        }
        let from_arg = from.as_arg();
        let to_arg = to.as_arg();
        if from_arg == to_arg {
            args.push("-r".to_string());
            args.push(format!(
                "{}:{}",
                Revision::arg_or_head(from_revision),
                Revision::arg_or_head(to_revision)
            ));
            args.push(from_arg);
        } else {
            args.push(format!("{from_arg}@{}", Revision::arg_or_head(from_revision)));
            args.push(format!("{to_arg}@{}", Revision::arg_or_head(to_revision)));
        }
        args.push(Self::path_arg(local_path));
        self.run(SvnCommandKind::Merge, true, args).await?;
        Ok(())
    }

    // ---- locking ------------------------------------------------------

    /// Take repository locks on paths.
    ///
    /// Best effort per path; listeners hear about every path whether
    /// or not the operation succeeded, so they can refresh state that
    /// may have changed partially. Retried on lock contention.
    pub async fn lock(
        &self,
        paths: &[&Path],
        comment: Option<&str>,
        force: bool,
    ) -> SvnResult<()> {
        self.set_base_dir_for(paths);
        let mut args = vec!["lock".to_string()];
        if force {
            args.push("--force".to_string());
        }
        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            args.push("-m".to_string());
            args.push(comment.to_string());
        }
        for path in paths {
            args.push(Self::path_arg(path));
        }
        let result = self.run_with_retry(SvnCommandKind::Lock, true, args).await;
        for path in paths {
            self.notifier.notify_change(path);
        }
        result.map(|_| ())
    }

    /// Release repository locks on paths.
    ///
    /// Listeners hear about every path regardless of outcome, as with
    /// [`SvnClient::lock`].
    pub async fn unlock(&self, paths: &[&Path], force: bool) -> SvnResult<()> {
        self.set_base_dir_for(paths);
        let mut args = vec!["unlock".to_string()];
        if force {
            args.push("--force".to_string());
        }
        for path in paths {
            args.push(Self::path_arg(path));
        }
        let result = self.run(SvnCommandKind::Unlock, true, args).await;
        for path in paths {
            self.notifier.notify_change(path);
        }
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::config::RetryPolicy;
    use crate::common::PollPolicy;
    use crate::infrastructure::process::{CapturedOutput, MockProcessRunner};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn ok_output(stdout: &str) -> SvnResult<CapturedOutput> {
        Ok(CapturedOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
        })
    }

    fn contention() -> SvnError {
        SvnError::command_failed(
            "svn ci",
            1,
            "svn: Attempted to lock an already-locked dir",
        )
    }

    fn client_with(config: SvnConfig, mock: MockProcessRunner) -> SvnClient {
        SvnClient::with_runner(config, Arc::new(mock))
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 5,
            interval: Duration::from_millis(100),
        }
    }

    #[tokio::test]
    async fn test_global_flags_with_credentials() {
        let mut mock = MockProcessRunner::new();
        mock.expect_run()
            .withf(|executable, args| {
                executable == "svn"
                    && args.windows(2).any(|w| w == ["--username", "alice"])
                    && args.windows(2).any(|w| w == ["--password", "secret"])
                    && args.contains(&"--non-interactive".to_string())
                    && args.windows(2).any(|w| w == ["--config-dir", "/tmp/cfg"])
            })
            .times(1)
            .returning(|_, _| ok_output("At revision 2.\n"));

        let config = SvnConfig::new()
            .with_credentials("alice", "secret")
            .with_config_dir("/tmp/cfg");
        let client = client_with(config, mock);
        let revision = client.update(Path::new("wc"), None).await.unwrap();
        assert_eq!(revision, Some(2));
    }

    #[tokio::test]
    async fn test_no_credential_flags_when_unset() {
        let mut mock = MockProcessRunner::new();
        mock.expect_run()
            .withf(|_, args| {
                !args.iter().any(|a| a == "--username" || a == "--password")
                    && args.contains(&"--non-interactive".to_string())
                    && !args.iter().any(|a| a == "--config-dir")
            })
            .times(1)
            .returning(|_, _| ok_output(""));

        let client = client_with(SvnConfig::new(), mock);
        client.revert(&[Path::new("wc/a.c")], false).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_credentials_are_omitted() {
        let mut mock = MockProcessRunner::new();
        mock.expect_run()
            .withf(|_, args| !args.iter().any(|a| a == "--username" || a == "--password"))
            .times(1)
            .returning(|_, _| ok_output(""));

        let client = client_with(SvnConfig::new().with_credentials("", ""), mock);
        client.cleanup(Path::new("wc")).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_retries_through_contention() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in_mock = calls.clone();
        let mut mock = MockProcessRunner::new();
        mock.expect_run().times(4).returning(move |_, _| {
            if calls_in_mock.fetch_add(1, Ordering::SeqCst) < 3 {
                Err(contention())
            } else {
                ok_output("Sending        wc/a.c\nCommitted revision 42.\n")
            }
        });

        let client = client_with(SvnConfig::new().with_retry(fast_retry()), mock);
        let start = tokio::time::Instant::now();
        let revision = client
            .commit(&[Path::new("wc/a.c")], "fix", true, false)
            .await
            .unwrap();

        assert_eq!(revision, Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // Three failures, three sleeps.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_surfaces_contention() {
        let mut mock = MockProcessRunner::new();
        mock.expect_run()
            .times(3)
            .returning(|_, _| Err(contention()));

        let retry = RetryPolicy {
            attempts: 2,
            interval: Duration::from_millis(100),
        };
        let client = client_with(SvnConfig::new().with_retry(retry), mock);
        let err = client
            .commit(&[Path::new("wc/a.c")], "fix", true, false)
            .await
            .unwrap_err();
        assert!(err.is_lock_contention());
    }

    #[tokio::test]
    async fn test_other_failures_never_retried() {
        let mut mock = MockProcessRunner::new();
        mock.expect_run().times(1).returning(|_, _| {
            Err(SvnError::command_failed(
                "svn ci",
                1,
                "svn: File not found: revision 3",
            ))
        });

        let client = client_with(SvnConfig::new().with_retry(fast_retry()), mock);
        let err = client
            .commit(&[Path::new("wc/a.c")], "fix", true, false)
            .await
            .unwrap_err();
        assert!(!err.is_lock_contention());
    }

    #[tokio::test]
    async fn test_empty_status_input_invokes_nothing() {
        // A mock with no expectations panics on any call.
        let mock = MockProcessRunner::new();
        let client = client_with(SvnConfig::new(), mock);
        let statuses = client.get_status(&[]).await.unwrap();
        assert!(statuses.is_empty());
    }

    #[tokio::test]
    async fn test_status_prefilters_paths_outside_working_copies() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("plain.txt");
        std::fs::write(&outside, "x").unwrap();

        let mock = MockProcessRunner::new();
        let client = client_with(SvnConfig::new(), mock);
        let statuses = client.get_status(&[outside.as_path()]).await.unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].is_managed());
        assert_eq!(statuses[0].revision(), None);
    }

    #[tokio::test]
    async fn test_status_tree_downgrades_not_working_copy() {
        let mut mock = MockProcessRunner::new();
        mock.expect_run().times(1).returning(|_, _| {
            Err(SvnError::command_failed(
                "svn status",
                1,
                "svn: '/tmp/elsewhere' is not a working copy",
            ))
        });

        let client = client_with(SvnConfig::new(), mock);
        let statuses = client
            .get_status_tree(Path::new("/tmp/elsewhere"), true, false)
            .await
            .unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].is_managed());
    }

    #[tokio::test]
    async fn test_add_downgrades_already_versioned_warning() {
        let mut mock = MockProcessRunner::new();
        mock.expect_run().times(1).returning(|_, _| {
            Err(SvnError::command_failed(
                "svn add",
                1,
                "svn: warning: 'a.c' is already under version control",
            ))
        });

        let client = client_with(SvnConfig::new(), mock);
        client.add_file(Path::new("wc/a.c")).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_mkdir_local_times_out_when_directory_never_appears() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");

        let mut mock = MockProcessRunner::new();
        mock.expect_run().times(1).returning(|_, _| ok_output("A  never-created\n"));

        let poll = PollPolicy {
            attempts: 3,
            interval: Duration::from_millis(100),
        };
        let client = client_with(SvnConfig::new().with_poll(poll), mock);
        let err = client.mkdir_local(&missing).await.unwrap_err();
        assert!(matches!(err, SvnError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_mkdir_local_returns_once_directory_exists() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("child");
        let target_in_mock = target.clone();

        let mut mock = MockProcessRunner::new();
        mock.expect_run().times(1).returning(move |_, _| {
            std::fs::create_dir(&target_in_mock).unwrap();
            ok_output("A  child\n")
        });

        let client = client_with(SvnConfig::new(), mock);
        client.mkdir_local(&target).await.unwrap();
    }

    #[tokio::test]
    async fn test_version_returns_first_line() {
        let mut mock = MockProcessRunner::new();
        mock.expect_run()
            .withf(|_, args| args.first().map(String::as_str) == Some("--version"))
            .times(1)
            .returning(|_, _| ok_output("svn, version 1.4.2 (r22196)\n   compiled Nov  3 2006\n"));

        let client = client_with(SvnConfig::new(), mock);
        assert_eq!(client.version().await.unwrap(), "svn, version 1.4.2 (r22196)");
    }

    #[tokio::test]
    async fn test_commit_with_nothing_to_send_returns_none() {
        let mut mock = MockProcessRunner::new();
        mock.expect_run().times(1).returning(|_, _| ok_output(""));

        let client = client_with(SvnConfig::new(), mock);
        let revision = client
            .commit(&[Path::new("wc")], "noop", true, false)
            .await
            .unwrap();
        assert_eq!(revision, None);
    }

    #[test]
    fn test_display_command_masks_password() {
        let client = client_with(
            SvnConfig::new().with_credentials("alice", "secret"),
            MockProcessRunner::new(),
        );
        let mut args = vec!["ci".to_string()];
        client.append_global_args(&mut args);
        let shown = client.display_command(&args);
        assert!(shown.contains("--password *****"));
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn test_base_dir_of_common_ancestor() {
        let a = PathBuf::from("/work/wc/src/a.c");
        let b = PathBuf::from("/work/wc/include/b.h");
        let base = SvnClient::base_dir_of(&[a.as_path(), b.as_path()]).unwrap();
        assert_eq!(base, PathBuf::from("/work/wc"));

        let single = SvnClient::base_dir_of(&[Path::new("/work/wc/src/a.c")]).unwrap();
        assert_eq!(single, PathBuf::from("/work/wc/src"));
    }
}

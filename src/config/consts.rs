// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default pull nesting ceiling.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 20;
/// Default number of frontiers one signal trigger may walk.
pub const DEFAULT_MAX_SIGNAL_LEVELS: usize = 1024;

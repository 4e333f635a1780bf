#[cfg(test)]
pub const POST_DATA: &str = "---
title: What I learned shipping a side project
date: 2024-05-12
description: Four weekends, one deploy button
tags: [project, starred]
score: 6
---

Shipping something small end to end teaches more than a year of reading
about how other people ship things.

The first weekend went to the build setup. The second went to deleting
half of what I wrote during the first.
";

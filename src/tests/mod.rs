mod locator;
